pub mod account;
pub mod currency;
pub mod demo;
pub mod directory;
pub mod fees;
pub mod ledger;
pub mod location;
pub mod network;
pub mod notification;
pub mod transaction;
pub mod verify;
pub mod wallet;
pub mod workflow;
