//! Sample nets shared by the integration tests.

#![allow(dead_code)]

use petri_bdd::builder::NetBuilder;
use petri_bdd::net::NetModel;

/// `p0(1) --t0--> p1(0)`.
pub fn toggle() -> NetModel {
    NetBuilder::new()
        .place("p0", 1)
        .place("p1", 0)
        .transition("t0")
        .arc("p0", "t0")
        .arc("t0", "p1")
        .build()
        .unwrap()
}

/// One token circulating through `n` places.
pub fn ring(n: usize) -> NetModel {
    let mut b = NetBuilder::new();
    for i in 0..n {
        b = b.place(format!("p{}", i), u32::from(i == 0));
    }
    for i in 0..n {
        b = b
            .transition(format!("t{}", i))
            .arc(format!("p{}", i), format!("t{}", i))
            .arc(format!("t{}", i), format!("p{}", (i + 1) % n));
    }
    b.build().unwrap()
}

/// Two processes competing for one lock.
pub fn mutex() -> NetModel {
    let mut b = NetBuilder::new().place("lock", 1);
    for i in 0..2 {
        b = b
            .place(format!("idle{}", i), 1)
            .place(format!("crit{}", i), 0)
            .transition(format!("enter{}", i))
            .transition(format!("leave{}", i))
            .arc(format!("idle{}", i), format!("enter{}", i))
            .arc("lock", format!("enter{}", i))
            .arc(format!("enter{}", i), format!("crit{}", i))
            .arc(format!("crit{}", i), format!("leave{}", i))
            .arc(format!("leave{}", i), format!("idle{}", i))
            .arc(format!("leave{}", i), "lock");
    }
    b.build().unwrap()
}

/// Dining philosophers picking up the left fork first. Deadlocks when every
/// philosopher holds a left fork.
pub fn philosophers(n: usize) -> NetModel {
    assert!(n >= 2);
    let mut b = NetBuilder::new();
    for i in 0..n {
        b = b
            .place(format!("think{}", i), 1)
            .place(format!("left{}", i), 0)
            .place(format!("eat{}", i), 0)
            .place(format!("fork{}", i), 1);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        b = b
            .transition(format!("take_left{}", i))
            .arc(format!("think{}", i), format!("take_left{}", i))
            .arc(format!("fork{}", i), format!("take_left{}", i))
            .arc(format!("take_left{}", i), format!("left{}", i))
            .transition(format!("take_right{}", i))
            .arc(format!("left{}", i), format!("take_right{}", i))
            .arc(format!("fork{}", j), format!("take_right{}", i))
            .arc(format!("take_right{}", i), format!("eat{}", i))
            .transition(format!("release{}", i))
            .arc(format!("eat{}", i), format!("release{}", i))
            .arc(format!("release{}", i), format!("think{}", i))
            .arc(format!("release{}", i), format!("fork{}", i))
            .arc(format!("release{}", i), format!("fork{}", j));
    }
    b.build().unwrap()
}

/// Xorshift generator, enough for reproducible test nets.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Random product of state machines: `components` groups of `size` places,
/// one token per group. Local transitions move a token inside a group,
/// synchronizing transitions move tokens in two groups at once. Every
/// transition keeps exactly one token per group, so the net is 1-safe.
pub fn random_safe_net(rng: &mut Rng, components: usize, size: usize, transitions: usize) -> NetModel {
    let name = |c: usize, i: usize| format!("c{}s{}", c, i);
    let mut b = NetBuilder::new();
    for c in 0..components {
        let start = rng.below(size);
        for i in 0..size {
            b = b.place(name(c, i), u32::from(i == start));
        }
    }
    for t in 0..transitions {
        let id = format!("t{}", t);
        b = b.transition(id.clone());
        let first = rng.below(components);
        let mut groups = vec![first];
        if components > 1 && rng.below(3) == 0 {
            groups.push((first + 1 + rng.below(components - 1)) % components);
        }
        for c in groups {
            let from = name(c, rng.below(size));
            let to = name(c, rng.below(size));
            b = b.arc(from, id.clone()).arc(id.clone(), to);
        }
    }
    b.build().unwrap()
}

/// Every 0/1 marking over `n` places, in lexicographic order.
pub fn binary_markings(n: usize) -> impl Iterator<Item = Vec<u32>> {
    (0..1u32 << n).map(move |bits| (0..n).rev().map(|p| bits >> p & 1).collect())
}
