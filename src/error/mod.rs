mod callsite;
mod registry;

pub use callsite::CallSiteError;
pub use registry::RegistryError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    CallSite(#[from] CallSiteError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type Result<T> = std::result::Result<T, Error>;
