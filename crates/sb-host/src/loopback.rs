//! In-memory one-wire link for driving the decoder without hardware.

use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use sb_engine::{encode_wire, ByteSource};

/// Create a link holding up to `capacity` captured bytes.
pub fn loopback(capacity: usize) -> (WireSender, LoopbackSource) {
    let (producer, consumer) = HeapRb::<u8>::new(capacity.max(1)).split();
    (WireSender { producer }, LoopbackSource { consumer })
}

/// Writing end: takes logical MIDI bytes and stores their captured form.
pub struct WireSender {
    producer: HeapProd<u8>,
}

impl WireSender {
    /// Queue a message; returns how many bytes fit.
    pub fn send(&mut self, message: &[u8]) -> usize {
        let mut sent = 0;
        for &byte in message {
            if self.producer.try_push(encode_wire(byte)).is_err() {
                break;
            }
            sent += 1;
        }
        sent
    }
}

/// Reading end, polled by the decoder.
pub struct LoopbackSource {
    consumer: HeapCons<u8>,
}

impl ByteSource for LoopbackSource {
    fn next_byte(&mut self) -> Option<u8> {
        self.consumer.try_pop()
    }
}
