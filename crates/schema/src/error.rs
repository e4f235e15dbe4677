use crate::name::ClassName;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("class not registered: {0}")]
    UnknownClass(ClassName),

    #[error("class {0} cannot extend itself")]
    SelfInheritance(ClassName),

    #[error("inheritance cycle through {0}")]
    InheritanceCycle(ClassName),
}
