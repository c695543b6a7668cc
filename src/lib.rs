pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod caller;
    pub mod pileup;
    pub mod stats;
    pub mod variant;
}

pub mod io {
    pub mod merge_writer;
    pub mod pileup_reader;
    pub mod readers;
    pub mod vcf_reader;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
