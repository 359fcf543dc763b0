mod access_control;
mod common;
mod counters;
mod statements;
