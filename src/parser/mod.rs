mod ast;
mod redirect;
mod split;

pub use ast::{Job, RedirectKind, RedirectTarget, Redirection, Stage};
pub use redirect::{extract_redirections, parse_stage};
pub use split::{parse_job, parse_script, tokenize};
