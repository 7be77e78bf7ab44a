//! Player input and the interrupt-to-loop queue
//!
//! The sampling interrupt never touches the game. It classifies a reading
//! into an [`InputCommand`] and pushes it through an [`InputSink`]; the game
//! loop pulls commands from the matching [`InputSource`].
//!
//! ```ignore
//! let mut queue = InputQueue::new();
//! let (mut sink, mut source) = input::split(&mut queue);
//! // interrupt: sink.push(InputCommand::Left);
//! // loop:      game.drain(&mut source);
//! ```

use heapless::spsc::{Consumer, Producer, Queue};

/// Slots in the input queue (one is always kept free)
pub const INPUT_QUEUE_CAPACITY: usize = 8;

/// Queue shared between the interrupt and the loop
pub type InputQueue = Queue<InputCommand, INPUT_QUEUE_CAPACITY>;

/// Commands the player can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputCommand {
    Left,
    Right,
    /// Soft drop one row
    Down,
    RotateCw,
    RotateCcw,
    /// Hard drop to the floor
    Drop,
    /// Start or restart a game
    Start,
    /// Toggle pause
    Pause,
}

/// Split a queue into its interrupt and loop ends
pub fn split(queue: &mut InputQueue) -> (InputSink<'_>, InputSource<'_>) {
    let (producer, consumer) = queue.split();
    (
        InputSink {
            producer,
            dropped: 0,
        },
        InputSource { consumer },
    )
}

/// Producing end, owned by the interrupt handler
pub struct InputSink<'a> {
    producer: Producer<'a, InputCommand, INPUT_QUEUE_CAPACITY>,
    dropped: u16,
}

impl InputSink<'_> {
    /// Queue a command
    ///
    /// When the queue is full the new command is dropped and `false` is
    /// returned.
    pub fn push(&mut self, command: InputCommand) -> bool {
        match self.producer.enqueue(command) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("input queue full, dropped {}", command);
                false
            }
        }
    }

    /// Commands dropped because the queue was full
    pub fn dropped(&self) -> u16 {
        self.dropped
    }
}

/// Consuming end, owned by the game loop
pub struct InputSource<'a> {
    consumer: Consumer<'a, InputCommand, INPUT_QUEUE_CAPACITY>,
}

impl InputSource<'_> {
    /// Oldest pending command
    pub fn pop(&mut self) -> Option<InputCommand> {
        self.consumer.dequeue()
    }

    /// Whether any command is pending
    pub fn is_pending(&self) -> bool {
        self.consumer.ready()
    }
}

impl Iterator for InputSource<'_> {
    type Item = InputCommand;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}
