//! Domain models for the catalog API.
//!
//! Each resource has a stored row type (also the list and write response),
//! an optional read-enriched detail type, and write/patch payloads that
//! derive [`validator::Validate`].

pub mod address;
pub mod collection;
pub mod lookbook;
pub mod order;
pub mod product;
pub mod product_image;
pub mod user;
pub mod variant;

pub use address::{Address, AddressPatch, AddressWrite};
pub use collection::{
    AddProduct, Collection, CollectionEntry, CollectionItem, CollectionItemPatch,
    CollectionPatch, CollectionWrite, NewCollectionItem,
};
pub use lookbook::{LookBook, LookBookDetail, LookBookPatch, LookBookVariant, LookBookWrite};
pub use order::{Order, OrderPatch, OrderWrite};
pub use product::{AddToCollection, Product, ProductDetail, ProductPatch, ProductWrite};
pub use product_image::{ImageUpload, ProductImage, ProductImagePatch, ProductImageWrite};
pub use user::{UserData, UserSignup};
pub use variant::{
    AttributeEntry, AttributeOp, ForeignAttribute, Variant, VariantAttribute, VariantDetail,
    VariantPatch, VariantWrite,
};
