pub mod backtest;
pub mod catalog;
pub mod chart;
pub mod comparison;
pub mod market;
pub mod request;
pub mod run;
pub mod series;
pub mod settings;
pub mod timeframe;
pub mod timestamp;
pub mod trade;
