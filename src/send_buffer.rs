use heapless::Vec;

pub struct SendBuffer<const BUFSIZE: usize> {
    buf: Vec<u8, BUFSIZE>,
    pos: usize,
}

impl<const BUFSIZE: usize> SendBuffer<BUFSIZE> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            pos: 0,
        }
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<(), ()> {
        self.buf = Vec::from_slice(buf)?;
        self.pos = 0;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn bytes_sent(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len() == self.pos
    }
}

impl<const BUFSIZE: usize> Iterator for SendBuffer<BUFSIZE> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.buf.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }
}
