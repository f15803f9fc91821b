//! Identifier types used by the harness.

use crate::define_id;

// One per harness invocation; all resources of a run are named after it.
define_id!(RunId, "run");

// One per listener connection opened against an edge.
define_id!(ListenerId, "lsn");
