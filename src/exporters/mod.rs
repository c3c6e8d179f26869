pub mod d3js;
pub mod folded;
