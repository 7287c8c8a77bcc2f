// Library root
// -----------
// `gh-keys` manages the SSH public keys of a GitHub account through the REST
// API. The binary (`main.rs`) parses the command line and hands everything
// to the dispatcher.
//
// Module responsibilities:
// - `cli`: command-line flags and the action priority.
// - `keyfile`: reads the public key line from disk.
// - `api`: the blocking HTTP client for `/user` and `/user/keys`.
// - `dispatch`: runs the selected action and reports the response.
// - `logging`: the tracing handle passed to `api` and `dispatch`.
// - `error`: the error type shared by all of the above.
pub mod api;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod keyfile;
pub mod logging;
