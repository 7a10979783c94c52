use crate::codegen::Backend;
use crate::resolved::{ResolvedStruct, StructTable, TypeClass};
use indexmap::IndexMap;
use serde_derive::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Generated text per struct name, in dependency-safe emission order.
pub type FragmentMap = IndexMap<String, String>;

/// A pure text generator for one struct; backends supply one for bodies and one for headers.
pub trait Generator {
    fn generate(&self, resolved: &ResolvedStruct, table: &StructTable) -> String;
}

impl<F> Generator for F
where
    F: Fn(&ResolvedStruct, &StructTable) -> String,
{
    fn generate(&self, resolved: &ResolvedStruct, table: &StructTable) -> String {
        self(resolved, table)
    }
}

struct BodyGenerator<'b>(&'b dyn Backend);

impl Generator for BodyGenerator<'_> {
    fn generate(&self, resolved: &ResolvedStruct, table: &StructTable) -> String {
        self.0.emit_body(resolved, table)
    }
}

struct HeaderGenerator<'b>(&'b dyn Backend);

impl Generator for HeaderGenerator<'_> {
    fn generate(&self, resolved: &ResolvedStruct, table: &StructTable) -> String {
        self.0.emit_header(resolved, table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    NotVisited,
    /// Fragment generation for this struct is on the current walk stack.
    InProgress,
    Done,
}

/// A dependency edge the driver did not follow because its target was already in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackEdge {
    pub from: String,
    pub to: String,
}

/// Per-run memo of visit states and finished fragments.
#[derive(Debug, Default)]
pub struct FragmentCache {
    states: HashMap<String, VisitState>,
    fragments: FragmentMap,
    short_circuited: Vec<BackEdge>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, name: &str) -> VisitState {
        self.states.get(name).copied().unwrap_or(VisitState::NotVisited)
    }

    fn begin(&mut self, name: &str) {
        self.states.insert(name.to_string(), VisitState::InProgress);
    }

    fn finish(&mut self, name: &str, text: String) {
        self.states.insert(name.to_string(), VisitState::Done);
        self.fragments.insert(name.to_string(), text);
    }

    fn short_circuit(&mut self, from: &str, to: &str) {
        debug!(from, to, "dependency cycle short-circuited");
        self.short_circuited.push(BackEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn into_run(self) -> DriverRun {
        DriverRun {
            fragments: self.fragments,
            short_circuited: self.short_circuited,
        }
    }
}

/// Result of walking the table with one generator.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRun {
    pub fragments: FragmentMap,
    pub short_circuited: Vec<BackEdge>,
}

impl DriverRun {
    pub fn order(&self) -> Vec<&str> {
        self.fragments.keys().map(String::as_str).collect()
    }
}

/// Everything one backend produced in one run, ready for the output assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutput {
    pub backend: &'static str,
    pub bodies: FragmentMap,
    pub headers: FragmentMap,
    /// Direct dependencies of every emitted struct, keyed in emission order.
    pub dependencies: IndexMap<String, BTreeSet<String>>,
    pub short_circuited: Vec<BackEdge>,
}

/// Direct struct dependencies of `resolved`: targets of `StructRef` fields present in
/// the table, deduplicated and in lexical order. Names missing from the table are dropped.
pub fn struct_dependencies(resolved: &ResolvedStruct, table: &StructTable) -> BTreeSet<String> {
    resolved
        .fields
        .iter()
        .filter_map(|field| match &field.class {
            TypeClass::StructRef(target) if table.contains(target) => Some(target.clone()),
            TypeClass::StructRef(_) | TypeClass::Primitive(_) | TypeClass::Unknown(_) => None,
        })
        .collect()
}

/// Depth-first, memoized walk over a struct table.
///
/// Every struct marked for generation is visited in table order, and every struct it
/// reaches through `StructRef` fields is generated first. A dependency that is already
/// in progress closes a cycle; that edge is recorded in [`DriverRun::short_circuited`]
/// and not followed, so ordering across it is not guaranteed.
pub struct CodegenDriver<'a> {
    table: &'a StructTable,
}

impl<'a> CodegenDriver<'a> {
    pub fn new(table: &'a StructTable) -> Self {
        Self { table }
    }

    pub fn dependencies(&self, resolved: &ResolvedStruct) -> BTreeSet<String> {
        struct_dependencies(resolved, self.table)
    }

    pub fn generate<G: Generator + ?Sized>(&self, generator: &G) -> DriverRun {
        let mut cache = FragmentCache::new();
        for resolved in self.table.marked() {
            self.visit(resolved, None, generator, &mut cache);
        }
        cache.into_run()
    }

    fn visit<G: Generator + ?Sized>(
        &self,
        resolved: &ResolvedStruct,
        parent: Option<&str>,
        generator: &G,
        cache: &mut FragmentCache,
    ) {
        match cache.state(&resolved.name) {
            VisitState::Done => return,
            VisitState::InProgress => {
                cache.short_circuit(parent.unwrap_or(resolved.name.as_str()), &resolved.name);
                return;
            }
            VisitState::NotVisited => {}
        }

        cache.begin(&resolved.name);
        for dependency in self.dependencies(resolved) {
            if let Some(target) = self.table.get(&dependency) {
                self.visit(target, Some(&resolved.name), generator, cache);
            }
        }
        cache.finish(&resolved.name, generator.generate(resolved, self.table));
    }

    /// Run the body and header generators of `backend` and collect dependency sets.
    pub fn generate_backend(&self, backend: &dyn Backend) -> BackendOutput {
        let bodies = self.generate(&BodyGenerator(backend));
        let headers = self.generate(&HeaderGenerator(backend));

        let dependencies = bodies
            .fragments
            .keys()
            .filter_map(|name| self.table.get(name))
            .map(|resolved| (resolved.name.clone(), self.dependencies(resolved)))
            .collect();

        debug!(
            backend = backend.id(),
            fragments = bodies.fragments.len(),
            cycles = bodies.short_circuited.len(),
            "backend generation finished"
        );

        BackendOutput {
            backend: backend.id(),
            bodies: bodies.fragments,
            headers: headers.fragments,
            dependencies,
            short_circuited: bodies.short_circuited,
        }
    }
}

/// Fragments for every marked struct of `table` and everything it reaches.
pub fn generate_fragments<G: Generator + ?Sized>(table: &StructTable, generator: &G) -> DriverRun {
    CodegenDriver::new(table).generate(generator)
}

pub fn generate_backend(table: &StructTable, backend: &dyn Backend) -> BackendOutput {
    CodegenDriver::new(table).generate_backend(backend)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
