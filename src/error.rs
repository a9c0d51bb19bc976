//! CLI error types.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    /// Catalog, sidebars or templates could not be read.
    #[display("could not read documentation sources")]
    Input,
    #[display("could not plan render jobs")]
    Plan,
    #[display("could not start the browser")]
    Browser,
    #[display("render run failed")]
    Run,
}
