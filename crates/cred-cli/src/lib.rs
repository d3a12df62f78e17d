//! # cred-cli: Operator CLI for the Credential Registry
//!
//! Provides the `credctl` command-line interface.
//!
//! ## Subcommands
//!
//! - `credctl api-key generate`: Create an API key in the database named by
//!   `DATABASE_URL` and print its plaintext once.
//! - `credctl check-payload`: Run a JSON credential payload through the
//!   assembler for its type without storing anything.
//!
//! ```bash
//! credctl api-key generate --description "Ontario MTO" --issuer-category provincial
//! credctl check-payload --credential-type passport passport.json
//! ```

pub mod api_key;
pub mod payload;
