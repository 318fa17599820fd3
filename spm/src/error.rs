use crate::mm::XlatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The boot loader handed over no secure payload.
    NoEntryPoint,
    /// The secure payload descriptor carries a null program counter.
    NullEntryPoint,
    /// The dispatcher was asked to set up twice.
    AlreadySetup,
    Xlat(XlatError),
}

impl From<XlatError> for Error {
    fn from(e: XlatError) -> Self {
        Error::Xlat(e)
    }
}
