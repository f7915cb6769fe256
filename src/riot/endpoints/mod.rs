mod account;
mod league;
mod match_v5;
