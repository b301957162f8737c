//! PDF decoding backend built on MuPDF

mod backend;
mod worker;

pub use backend::{MupdfDocument, MupdfPage, MupdfSource};
