//! Chat-thread DOM to Markdown conversion
//!
//!     This crate turns the rendered HTML of a chat thread into a structured
//!     Markdown document, and keeps the clipboard capture queue that the
//!     browser-side capture shim feeds. It is a pure lib: it powers chatmd-cli
//!     but is shell agnostic, that is no code here should suppose a shell
//!     environment, be it to std print, env vars etc.
//!
//! Architecture
//!
//!     The page markup is third-party and versioned, so everything that touches
//!     it is heuristic and best-effort: a conversion step that cannot make sense
//!     of its node returns an empty result instead of an error, and the
//!     assembler skips it. Hard errors are reserved for operation-level
//!     conditions (no message nodes at all, the environment denying the
//!     clipboard).
//!
//!     Conversion runs in two halves. The first half is recursive descent over
//!     a parsed snapshot of the page (html5ever + rcdom), producing an explicit
//!     intermediate tree of typed block and inline nodes (./ir/nodes.rs). The
//!     second half renders that tree to Markdown text (./ir/render.rs). Keeping
//!     an explicit tree instead of rewriting the DOM in place means the
//!     renderer never has to rely on a "read all descendant text" primitive.
//!
//!     The file structure :
//!     .
//!     ├── error.rs            # ExportError
//!     ├── normalize.rs        # whitespace/newline normalizer
//!     ├── options.rs          # ConversionOptions (the export knobs)
//!     ├── dom/                # rcdom parsing + query helpers
//!     ├── ir
//!     │   ├── nodes.rs        # typed Block/Inline/Message/Thread tree
//!     │   └── render.rs       # tree -> Markdown text
//!     ├── convert             # DOM subtree -> Block tree (strip pass, descent)
//!     ├── detect.rs           # author role + timestamp heuristics
//!     ├── locate.rs           # message node matchers + dedup
//!     ├── page.rs             # ThreadPage seam (live page vs saved capture)
//!     ├── settle.rs           # lazy-load settling (bounded scroll loop)
//!     ├── assemble.rs         # orchestrator, one call per export request
//!     ├── messages.rs         # cross-context event/request contracts
//!     └── queue.rs            # capture queue + session store + flush
//!
//! The page seam
//!
//!     The natural host of this logic is a live browser page. Everything the
//!     core needs from it is behind the ThreadPage trait: scroll driving for
//!     the settler and an HTML snapshot for traversal. StaticPage adapts a
//!     saved capture (a file, a string) to the same seam, which is what the CLI
//!     and the tests use.
//!
//! Library Choices
//!
//!     HTML parsing is html5ever with the rcdom tree, which handles the
//!     malformed markup a scraped page will eventually throw at us. Markdown
//!     rendering is hand-written: the output shapes (role headers, math
//!     fences, collapsed image links) are fixed by the export contract and are
//!     simpler to emit directly than to push through a CommonMark AST.

pub mod assemble;
pub mod convert;
pub mod detect;
pub mod dom;
pub mod error;
pub mod ir;
pub mod locate;
pub mod messages;
pub mod normalize;
pub mod options;
pub mod page;
pub mod queue;
pub mod settle;

pub use assemble::{assemble, assemble_with_config, handle_export_request, AssembleConfig};
pub use error::ExportError;
pub use options::ConversionOptions;
pub use page::{StaticPage, ThreadPage};
pub use queue::{CaptureItem, CaptureQueue, ClipboardSink, SessionStore};
