//! Form components: validated inputs for the add-holding flow.

pub mod number_input;
pub mod text_input;
pub mod validation;

pub use number_input::NumberInput;
pub use text_input::TextInput;
pub use validation::{
    FieldMeta, PositiveNumber, Required, SymbolPattern, ValidationResult, ValidationRule,
    ValidatorChain,
};
