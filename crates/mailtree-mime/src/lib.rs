//! # mailtree-mime
//!
//! RFC 2047 encoded-word handling for email header text.
//!
//! ## Features
//!
//! - **Lenient decoding**: [`decode_words`] never fails; malformed words and
//!   unknown charsets degrade to the raw text
//! - **Folding rule**: whitespace between adjacent encoded-words is removed
//! - **Charsets**: every WHATWG label via `encoding_rs`, RFC 2231 language
//!   suffixes ignored
//! - **Encoding**: [`encode_word`] builds `Q` or `B` words
//!
//! ## Quick Start
//!
//! ```
//! use mailtree_mime::decode_words;
//!
//! let name = decode_words("=?ISO-8859-1?Q?B=FCro?= =?ISO-8859-1?Q?_Report.txt?=");
//! assert_eq!(name, "Büro Report.txt");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod words;

pub mod charset;
pub mod encoding;

pub use encoding::WordEncoding;
pub use error::{Error, Result};
pub use words::{EncodedWord, decode_words, encode_word};
