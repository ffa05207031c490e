use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Organisational placement of a user. Top-level managers have no manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub department: Option<String>,
    pub manager_id: Option<UserId>,
}

impl UserProfile {
    /// Whether `other` belongs to this user's team: same department or same
    /// manager. A missing department or manager never matches.
    pub fn shares_team_with(&self, other: &UserProfile) -> bool {
        if other.id == self.id {
            return false;
        }

        let same_department = matches!(
            (&self.department, &other.department),
            (Some(mine), Some(theirs)) if mine == theirs
        );
        let same_manager = matches!(
            (&self.manager_id, &other.manager_id),
            (Some(mine), Some(theirs)) if mine == theirs
        );

        same_department || same_manager
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub department: Option<String>,
    pub manager_id: Option<UserId>,
}

impl From<UserProfile> for TeamMember {
    fn from(profile: UserProfile) -> Self {
        Self { user_id: profile.id, department: profile.department, manager_id: profile.manager_id }
    }
}
