/// Slots reserved after a slave payload for the event-count trailer.
pub const TRAILER_LEN: usize = 1;

pub struct ReceiveBuffer<const BUFSIZE: usize> {
    buf: [u8; BUFSIZE],
    size: usize,
    target: usize,
    completed: usize,
}

impl<const BUFSIZE: usize> ReceiveBuffer<BUFSIZE> {
    pub const fn new() -> Self {
        Self {
            buf: [0; BUFSIZE],
            size: 0,
            target: 0,
            completed: 0,
        }
    }

    /// Forgets the bytes of the transaction in progress. The last completed
    /// message stays readable until it is overwritten.
    pub fn begin(&mut self) {
        self.size = 0;
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        if self.size == BUFSIZE {
            Err(())
        } else {
            self.buf[self.size] = byte;
            self.size += 1;
            Ok(())
        }
    }

    /// Like [`Self::write_byte`], but keeps the trailer slot free.
    pub fn write_payload_byte(&mut self, byte: u8) -> Result<(), ()> {
        if self.size + TRAILER_LEN >= BUFSIZE {
            Err(())
        } else {
            self.write_byte(byte)
        }
    }

    pub fn get_size(&self) -> usize {
        self.size
    }

    pub fn set_target(&mut self, target: usize) -> Result<(), ()> {
        if target > BUFSIZE {
            Err(())
        } else {
            self.target = target;
            Ok(())
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn is_complete(&self) -> bool {
        self.size >= self.target
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /// Closes the message in progress, appends `trailer` and returns payload
    /// plus trailer. `None` when there is no slot left for the trailer.
    pub fn complete_with_trailer(&mut self, trailer: u8) -> Option<&[u8]> {
        let size = self.size;
        *self.buf.get_mut(size)? = trailer;
        self.completed = size;
        self.size = 0;
        Some(&self.buf[..size + TRAILER_LEN])
    }

    /// Payload of the most recently completed message, without its trailer.
    pub fn last_message(&self) -> &[u8] {
        &self.buf[..self.completed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_keeps_trailer_slot() {
        let mut rb = ReceiveBuffer::<4>::new();
        for b in 0..3 {
            assert!(rb.write_payload_byte(b).is_ok());
        }
        assert!(rb.write_payload_byte(3).is_err());
        assert_eq!(rb.get_size(), 3);
        assert_eq!(rb.complete_with_trailer(9), Some(&[0, 1, 2, 9][..]));
        assert_eq!(rb.get_size(), 0);
    }

    #[test]
    fn last_message_survives_next_start() {
        let mut rb = ReceiveBuffer::<8>::new();
        rb.write_payload_byte(0xAA).unwrap();
        rb.complete_with_trailer(2);
        rb.begin();
        assert_eq!(rb.last_message(), &[0xAA]);
    }

    #[test]
    fn trailer_needs_a_free_slot() {
        let mut rb = ReceiveBuffer::<0>::new();
        assert!(rb.write_payload_byte(1).is_err());
        assert_eq!(rb.complete_with_trailer(1), None);
        assert_eq!(rb.last_message(), &[] as &[u8]);

        let mut rb = ReceiveBuffer::<1>::new();
        assert_eq!(rb.complete_with_trailer(3), Some(&[3][..]));

        let mut rb = ReceiveBuffer::<2>::new();
        rb.write_byte(1).unwrap();
        rb.write_byte(2).unwrap();
        assert_eq!(rb.complete_with_trailer(3), None);
        assert_eq!(rb.get_size(), 2);
    }

    #[test]
    fn target_bounded_by_capacity() {
        let mut rb = ReceiveBuffer::<4>::new();
        assert!(rb.set_target(5).is_err());
        rb.set_target(2).unwrap();
        rb.begin();
        rb.write_byte(1).unwrap();
        assert!(!rb.is_complete());
        rb.write_byte(2).unwrap();
        assert!(rb.is_complete());
        assert_eq!(rb.filled(), &[1, 2]);
    }
}
