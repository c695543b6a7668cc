mod bam_stats;
mod combine;

pub use bam_stats::bam_stats;
pub use combine::combine;
