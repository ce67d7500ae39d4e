// src/handlers.rs
//
// Camada HTTP: handlers finos que delegam tudo aos serviços e embrulham a
// resposta no envelope {"data": ...}.

pub mod account;
pub mod auth;
pub mod documents;
pub mod folders;
pub mod invites;
pub mod tenancy;
pub mod units;
pub mod users;
