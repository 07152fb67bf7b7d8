pub mod leaderboard;
pub mod resource;
