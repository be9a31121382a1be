use super::EchoMessage;
use crate::error::{CodecError, PairField};

/// Checks that `reply` answers `request`.
///
/// Type and checksum are not compared: the type differs between request
/// and reply, and the checksum was verified when the reply was decoded.
pub fn pair(request: &EchoMessage, reply: &EchoMessage) -> Result<(), CodecError> {
    let (req, rep) = (&request.header, &reply.header);
    if req.code != rep.code {
        return Err(CodecError::PairMismatch(PairField::Code));
    }
    if req.identifier != rep.identifier {
        return Err(CodecError::PairMismatch(PairField::Identifier));
    }
    if req.sequence_number != rep.sequence_number {
        return Err(CodecError::PairMismatch(PairField::SequenceNumber));
    }
    if request.payload != reply.payload {
        return Err(CodecError::PairMismatch(PairField::Payload));
    }
    Ok(())
}
