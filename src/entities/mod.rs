pub mod accounts;
pub mod articles;
pub mod devices;
pub mod households;
pub mod invitations;
pub mod metadata;
pub mod storage_locations;

pub mod prelude {
    pub use super::accounts::Entity as Accounts;
    pub use super::articles::Entity as Articles;
    pub use super::devices::Entity as Devices;
    pub use super::households::Entity as Households;
    pub use super::invitations::Entity as Invitations;
    pub use super::metadata::Entity as Metadata;
    pub use super::storage_locations::Entity as StorageLocations;
}
