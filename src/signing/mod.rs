pub mod secret;
pub mod wallet;

pub use secret::SecretString;
pub use wallet::Wallet;
