//! Recorded simulation commands.
//!
//! Managers never mutate layers while recording. Each tick they append
//! [`SimCommand`]s to the shared [`CommandBuffer`]; the context submits the
//! buffer once per tick and executes every command in recording order. Work
//! recorded this tick always completes before the next tick records.

use crate::arena::LayerHandle;
use crate::channel::SimQuantity;

/// One unit of deferred simulation work.
#[derive(Clone, Copy, Debug)]
pub enum SimCommand {
    /// Fill every channel of a layer with `value`.
    Clear {
        /// Target layer.
        handle: LayerHandle,
        /// Fill value.
        value: f32,
    },
    /// Multiply every value in a layer by `factor`.
    Fade {
        /// Target layer.
        handle: LayerHandle,
        /// Per-tick decay factor in `[0, 1]`.
        factor: f32,
    },
    /// Run spectrum evolution and the inverse FFTs for one slice, then pack
    /// the displacement field into the slice's layer.
    SynthesizeWaves {
        /// Target layer.
        handle: LayerHandle,
        /// Simulation time the spectra are evolved to.
        time: f32,
    },
    /// Accumulate foam where the wave displacement field pinches together.
    AccumulateFoam {
        /// Target foam layer.
        handle: LayerHandle,
        /// Foam injected per unit of pinch, already scaled by dt.
        strength: f32,
    },
    /// Draw every registered input for a quantity into the slice's layer,
    /// sorted by (batch index, wavelength).
    DrawInputs {
        /// Quantity whose registrations are drawn.
        quantity: SimQuantity,
        /// Target layer.
        handle: LayerHandle,
    },
}

/// Ordered list of commands for one tick.
#[derive(Default)]
pub struct CommandBuffer {
    commands: Vec<SimCommand>,
}

impl CommandBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Nothing executes until submission.
    pub fn record(&mut self, command: SimCommand) {
        self.commands.push(command);
    }

    /// Number of commands recorded so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take every recorded command, in recording order, leaving the buffer
    /// empty for the next tick.
    pub fn drain(&mut self) -> Vec<SimCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::TextureArena;

    /// Commands come back out in recording order.
    #[test]
    fn test_drain_preserves_order() {
        let mut arena = TextureArena::new();
        let a = arena.allocate(SimQuantity::Foam, 0, 4).unwrap();
        let b = arena.allocate(SimQuantity::Foam, 1, 4).unwrap();

        let mut buffer = CommandBuffer::new();
        buffer.record(SimCommand::Clear {
            handle: a,
            value: 0.0,
        });
        buffer.record(SimCommand::Fade {
            handle: b,
            factor: 0.9,
        });
        assert_eq!(buffer.len(), 2);

        let drained = buffer.drain();
        assert!(matches!(drained[0], SimCommand::Clear { .. }));
        assert!(matches!(drained[1], SimCommand::Fade { .. }));
        assert!(buffer.is_empty());
    }
}
