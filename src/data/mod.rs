//! Inbound/outbound data-packet (PDU) header framing and fragment reassembly.

pub mod fields;
pub mod header;
pub mod reassembly;

pub use self::header::{
    ConfirmedHeader,
    ConfirmedFields,
    ConfirmedPreamble,
    UnconfirmedHeader,
    UnconfirmedFields,
    UnconfirmedPreamble,
    ServiceAccessPoint,
    Manufacturer,
    LogicalLink,
    BlockCount,
    PadCount,
    Sequencing,
    DataOffset,
};

pub use self::reassembly::{ConfirmedReassembler, UnconfirmedReassembler, ReassembledPacket};
