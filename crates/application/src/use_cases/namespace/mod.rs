pub mod added;
pub mod deleted;

pub use added::NamespaceAddedUseCase;
pub use deleted::NamespaceDeletedUseCase;
