// src/schedule/dump.rs

//! Human-readable schedule dump. Meant for debugging, not for parsing.

use std::fmt;

use crate::schedule::{Binding, Schedule};

struct Instances<'a>(&'a [Binding]);

impl fmt::Display for Instances<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", b.instance)?;
        }
        f.write_str("]")
    }
}

impl<C: fmt::Debug> fmt::Display for Schedule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "schedule {} ({} passes, {} batches, {} pools, reuse {:?})",
            &self.fingerprint[..self.fingerprint.len().min(16)],
            self.pass_count(),
            self.batches.len(),
            self.pools.len(),
            self.reuse,
        )?;

        writeln!(f, "pools:")?;
        for pool in &self.pools {
            writeln!(f, "  {} {:?} capacity {}", pool.id, pool.class, pool.capacity)?;
        }

        for batch in &self.batches {
            writeln!(f, "batch {}:", batch.index)?;
            for pass in &batch.passes {
                writeln!(
                    f,
                    "  {} {}  acquire {}  release {}",
                    pass.id,
                    pass.name,
                    Instances(&pass.acquire),
                    Instances(&pass.release),
                )?;
            }
        }

        Ok(())
    }
}
