use helium_core::EmitError;
use helium_template::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Attributes cannot be set on a fragment.")]
    FragmentAttributes,

    #[error("Event listener used as a child (slot {slot}).")]
    ListenerAsChild { slot: usize },

    #[error("Event listener bound to attribute \"{name}\"; listener attributes start with \"on\".")]
    ListenerOnPlainAttribute { name: String },

    #[error("Attribute \"{name}\" expects an event listener, found {found}.")]
    ListenerExpected { name: String, found: &'static str },

    #[error("Attribute \"{name}\" cannot hold a {kind} value.")]
    NonPrimitiveAttribute { name: String, kind: &'static str },

    #[error("No value supplied for slot {slot}.")]
    MissingValue { slot: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Duplicate entry with ID {id} at index {index}.")]
    DuplicateKey { id: String, index: usize },

    /// A listener failed while a dynamic value was being delivered.
    #[error("{0}")]
    Emission(EmitError),
}

impl From<EmitError> for RenderError {
    // errors raised by the renderer's own listeners come back typed
    fn from(error: EmitError) -> Self {
        match error.downcast::<RenderError>() {
            Ok(error) => *error,
            Err(error) => RenderError::Emission(error),
        }
    }
}
