mod ema;

pub use ema::Ema2;
