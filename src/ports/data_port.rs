//! Bar data access port trait.

use crate::domain::error::SimchartError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// Load an ordered bar series. An empty series is not an error.
    fn load_bars(&self) -> Result<Vec<Bar>, SimchartError>;
}
