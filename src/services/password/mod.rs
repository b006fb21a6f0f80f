// Password generation and validation

pub mod generator;
pub mod validator;

pub use generator::{
    generate_password, generate_passwords, CharClass, GenerationOptions, PasswordError,
    PasswordGenerator,
};
pub use validator::{
    entropy_bits, validate, Check, CheckValue, Strength, ValidationRequirements, ValidationResult,
};
