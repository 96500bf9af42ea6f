//! One file per upstream API family. Each endpoint builds its URL and
//! delegates to [`RiotClient::get`](crate::riot::RiotClient::get).

mod account;
mod league;
mod mastery;
mod match_v5;
mod summoner;
