pub mod charts;
pub mod drilldown;
pub mod panels;
pub mod table;
