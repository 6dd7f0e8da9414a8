pub mod entity;
pub mod json_file;
pub mod json_repo;
pub mod mapper;

pub use json_repo::{
    JsonPackagesRepository, JsonPurchaseLog, JsonStores, JsonTransferLog, JsonUsersRepository,
};
