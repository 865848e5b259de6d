//! NID (Network ID/Data Unit ID) parsing and status-symbol interleaving shared by the
//! framing layer.

pub mod nid;
pub mod status;
