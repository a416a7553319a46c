pub mod dice;
pub mod lint;
pub mod loader;
pub mod state;
pub mod validator;
