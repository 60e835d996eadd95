pub mod autojoin;
