// ─── CubicLauncher Core ───
// Installation and launch pipeline for a desktop game launcher.
//
// Architecture:
//   core/
//     fetch/       — Streaming downloads with redirects, retry, SHA-1
//     version/     — Remote manifest + normalized version descriptors
//     loader/      — Pinned mod-loader releases and variant synthesis
//     resolver/    — Local/remote reconciliation + repair, single-flight
//     materialize/ — Libraries, assets and mods onto disk
//     launch/      — Classpath + argument expansion into a launch config
//     collab/      — Auth, mod catalog and process-runner seams
//     state/       — Long-lived wiring and the high-level pipeline
//     paths/       — The on-disk layout contract
//     progress/    — Coalesced progress events

pub mod collab;
pub mod error;
pub mod fetch;
pub mod http;
pub mod launch;
pub mod loader;
pub mod materialize;
pub mod paths;
pub mod progress;
pub mod resolver;
pub mod state;
pub mod version;
