// Core modules
pub mod tenant;
pub mod user;
pub mod address;
pub mod product;

// Re-export commonly used types
pub use tenant::{
    InvalidTenantId, TenantId, MAX_DATABASE_NAME_LEN, MAX_TENANT_ID_LEN, PRIMARY_TENANT_IDS,
};
pub use user::{NewUser, Role, UpdateUser, User, UserProfile};
pub use address::{Address, UpdateAddress};
pub use product::{NewProduct, Product, UpdateProduct};
