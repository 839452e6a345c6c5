pub mod catalog;
pub mod consts;
pub mod derived;
pub mod error;
pub mod export;
pub mod geometry;
pub mod record;
pub mod pipeline;
pub mod reduce;
pub mod retry;
pub mod series;
