pub mod chunking;
pub mod dp;
pub mod lrc;
pub mod normalize;
pub mod recognized;
pub mod report;
pub mod resolve;
pub mod similarity;
pub mod time_format;
pub mod transcript;
