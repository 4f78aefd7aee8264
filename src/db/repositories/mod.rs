pub mod account;
pub mod article;
pub mod device;
pub mod household;
pub mod invitation;
pub mod metadata;
pub mod storage_location;
