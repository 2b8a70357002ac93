mod common;
mod eligibility;
mod lifecycle;
mod ranking;
mod simulation;
