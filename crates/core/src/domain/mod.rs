pub mod approval;
pub mod leave;
pub mod user;
pub mod verdict;
pub mod workload;
