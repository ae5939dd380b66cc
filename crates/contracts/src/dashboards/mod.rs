pub mod d100_best_sellers;
