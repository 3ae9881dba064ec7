//! Parse context: process-wide state consulted by the lexer/parser
//! while walking a model source file. Owns the declaration-scope stack,
//! bracket-nesting counters, the "gather this function body verbatim" mode,
//! and the per-function identifier/pointer maps the middle-end wires
//! dependencies from.

use std::collections::HashMap;

use omc_core::SourceLoc;

#[cfg(test)]
#[path = "parse_context_tests.rs"]
mod parse_context_tests;

/// What declarative construct is currently being parsed. Stacked so that,
/// e.g., a table's dimension list can temporarily shadow the enclosing
/// entity scope if a model ever nests declarations (the grammar doesn't
/// require nesting, but the context is written to tolerate it rather than
/// assume a fixed depth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Entity(String),
    Table(String),
    EntitySet(String),
    Classification(String),
    Partition(String),
    Parameter(String),
}

/// Fully-qualified name and declaration site of a member function found
/// while gathering a C++ chunk.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub qualified_name: String,
    pub params: Vec<String>,
    pub loc: SourceLoc,
}

/// A call to a recognized RNG stream function found inside a function
/// body, e.g. `RandUniform(7)`.
#[derive(Debug, Clone)]
pub struct RngStreamCall {
    pub stream: i64,
    pub loc: SourceLoc,
}

const RNG_FUNCTIONS: &[&str] = &[
    "RandUniform",
    "RandNormal",
    "RandBernoulli",
    "RandPoisson",
    "RandExponential",
    "RandLogistic",
    "RandWeibull",
    "RandGamma",
];

pub fn is_rng_function(name: &str) -> bool {
    RNG_FUNCTIONS.contains(&name)
}

/// Process-wide parsing state, owned by the driver for the duration of a
/// build and threaded through the parser.
#[derive(Debug, Default)]
pub struct ParseContext {
    scopes: Vec<Scope>,
    brace_depth: u32,
    paren_depth: u32,
    bracket_depth: u32,

    /// True while the parser is gathering an entire C++ member-function
    /// body verbatim rather than interpreting DSL grammar.
    gathering_body: bool,
    /// `(token text, kind name)` pairs for the function body currently (or
    /// most recently) gathered.
    current_body_tokens: Vec<(String, &'static str)>,

    /// `is_fixed_parameter_value`: the lexer is inside a default/fixed
    /// parameter-value literal list, so a `NOTE` comment routes to "source
    /// notes".
    pub is_fixed_parameter_value: bool,
    /// `is_scenario_parameter_value`: inside a workset parameter-value
    /// list, so a `NOTE` comment routes to "input notes".
    pub is_scenario_parameter_value: bool,

    functions: HashMap<String, FunctionDecl>,
    /// function qualified name -> identifiers referenced in its body (in
    /// first-seen order, duplicates kept so call-count style analyses are
    /// possible, though dependency wiring only needs set membership).
    body_identifiers: HashMap<String, Vec<String>>,
    /// function qualified name -> `(link, field)` pointer accesses
    /// (`link->field`) referenced in its body.
    body_pointers: HashMap<String, Vec<(String, String)>>,

    rng_calls: Vec<RngStreamCall>,
    seen_rng_streams: HashMap<i64, SourceLoc>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    // --- scope stack ---

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn current_entity(&self) -> Option<&str> {
        self.scopes.iter().rev().find_map(|s| match s {
            Scope::Entity(name) => Some(name.as_str()),
            _ => None,
        })
    }

    // --- nesting counters ---

    pub fn enter_brace(&mut self) {
        self.brace_depth += 1;
    }

    /// Returns the depth *before* this close, so callers can detect "this
    /// closes the outermost brace of a function prototype" (depth was 1).
    pub fn exit_brace(&mut self) -> u32 {
        let depth = self.brace_depth;
        self.brace_depth = self.brace_depth.saturating_sub(1);
        depth
    }

    pub fn brace_depth(&self) -> u32 {
        self.brace_depth
    }

    pub fn enter_paren(&mut self) {
        self.paren_depth += 1;
    }

    pub fn exit_paren(&mut self) {
        self.paren_depth = self.paren_depth.saturating_sub(1);
    }

    pub fn enter_bracket(&mut self) {
        self.bracket_depth += 1;
    }

    pub fn exit_bracket(&mut self) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
    }

    // --- C++ body gathering ---

    pub fn begin_gather_body(&mut self) {
        self.gathering_body = true;
        self.current_body_tokens.clear();
    }

    pub fn is_gathering_body(&self) -> bool {
        self.gathering_body
    }

    pub fn push_body_token(&mut self, text: String, kind: &'static str) {
        self.current_body_tokens.push((text, kind));
    }

    /// Ends body gathering for `function`, recording its identifier and
    /// pointer-access sets from the tokens collected since
    /// `begin_gather_body`.
    pub fn end_gather_body(&mut self, function: &str) {
        self.gathering_body = false;
        let tokens = std::mem::take(&mut self.current_body_tokens);

        let mut identifiers = Vec::new();
        let mut pointers = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let (text, kind) = &tokens[i];
            if *kind == "ident" {
                identifiers.push(text.clone());
                if i + 2 < tokens.len() && tokens[i + 1].1 == "arrow" && tokens[i + 2].1 == "ident"
                {
                    pointers.push((text.clone(), tokens[i + 2].0.clone()));
                    i += 2;
                    continue;
                }
            }
            i += 1;
        }

        self.body_identifiers.insert(function.to_string(), identifiers);
        self.body_pointers.insert(function.to_string(), pointers);
    }

    /// Records a function body's identifier and pointer-access sets found
    /// outside of token-by-token gathering, e.g. by
    /// [`crate::parser::body_scan`] scanning a whole file at once. Indexed
    /// both under `qualified_name` and, if qualified, under its bare
    /// trailing segment, since model source may declare an event's time/
    /// implement function either way and dependency wiring looks
    /// the function up by the bare name carried in the event declaration.
    pub fn record_function_body(
        &mut self,
        qualified_name: &str,
        identifiers: Vec<String>,
        pointers: Vec<(String, String)>,
    ) {
        if let Some(bare) = qualified_name.rsplit("::").next()
            && bare != qualified_name
        {
            self.body_identifiers.insert(bare.to_string(), identifiers.clone());
            self.body_pointers.insert(bare.to_string(), pointers.clone());
        }
        self.body_identifiers.insert(qualified_name.to_string(), identifiers);
        self.body_pointers.insert(qualified_name.to_string(), pointers);
    }

    pub fn body_identifiers(&self, function: &str) -> &[String] {
        self.body_identifiers
            .get(function)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn body_pointers(&self, function: &str) -> &[(String, String)] {
        self.body_pointers
            .get(function)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // --- function index ---

    pub fn register_function(&mut self, decl: FunctionDecl) {
        self.functions.insert(decl.qualified_name.clone(), decl);
    }

    pub fn function(&self, qualified_name: &str) -> Option<&FunctionDecl> {
        self.functions.get(qualified_name)
    }

    // --- RNG stream calls ---

    /// Records a call to a recognized RNG function. `literal_arg` is the
    /// integer stream number if the call's argument was a literal; `None`
    /// means a non-literal argument, which is always an error.
    pub fn record_rng_call(
        &mut self,
        literal_arg: Option<i64>,
        loc: SourceLoc,
    ) -> Result<(), RngError> {
        let Some(stream) = literal_arg else {
            return Err(RngError::NonLiteral { loc });
        };
        if let Some(first) = self.seen_rng_streams.get(&stream) {
            return Err(RngError::Duplicate {
                stream,
                first: first.clone(),
                second: loc,
            });
        }
        self.seen_rng_streams.insert(stream, loc.clone());
        self.rng_calls.push(RngStreamCall { stream, loc });
        Ok(())
    }

    pub fn rng_calls(&self) -> &[RngStreamCall] {
        &self.rng_calls
    }
}

#[derive(Debug, Clone)]
pub enum RngError {
    NonLiteral { loc: SourceLoc },
    Duplicate {
        stream: i64,
        first: SourceLoc,
        second: SourceLoc,
    },
}

impl From<RngError> for omc_core::BuildError {
    fn from(err: RngError) -> Self {
        match err {
            RngError::NonLiteral { loc } => omc_core::BuildError::NonLiteralRngStream { loc },
            RngError::Duplicate {
                stream,
                first,
                second,
            } => omc_core::BuildError::DuplicateRngStream {
                stream,
                first,
                second,
            },
        }
    }
}
