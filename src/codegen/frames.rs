use crate::language::errors::{SemanticError, SemanticResult};
use crate::language::span::Span;

use super::indent;

/// Index of a frame in the arena. Frames form a tree with upward parent
/// links and downward child lists; indices avoid parent/child reference
/// cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameId(pub(super) usize);

/// Expression/slot type as the generator sees it.
///
/// `Dynamic` is every expression under the dynamic strategy. `Unknown` only
/// arises under the static strategy, for invocations whose callee has no
/// return type yet (recursion, or a procedure used as a value); it passes
/// every type check and defers the pathological cases to the compiler
/// collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprTy {
    Long,
    Rational,
    Boolean,
    Dynamic,
    Unknown,
}

impl ExprTy {
    pub fn rust_type(&self) -> &'static str {
        match self {
            ExprTy::Long => "i64",
            ExprTy::Rational => "f64",
            ExprTy::Boolean => "bool",
            ExprTy::Dynamic => "Val",
            ExprTy::Unknown => "i64", // never rendered; creation from Unknown is rejected
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExprTy::Long => "long",
            ExprTy::Rational => "rational",
            ExprTy::Boolean => "boolean",
            ExprTy::Dynamic => "value",
            ExprTy::Unknown => "unknown",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ExprTy::Long | ExprTy::Rational)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ExprTy::Unknown)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Parameter,
    Variable,
}

/// A named storage location within a frame: a parameter or a lazily created
/// variable. Insertion order is preserved so generated record fields and
/// constructions are deterministic.
#[derive(Clone, Debug)]
pub struct Slot {
    pub name: String,
    pub ty: ExprTy,
    pub kind: SlotKind,
}

/// One lexical scope: a function/procedure body or the implicit entry
/// frame. Mutated only while its subtree is being traversed, frozen once
/// traversal completes.
#[derive(Debug)]
pub struct Frame {
    pub name: String,
    pub parent: Option<FrameId>,
    pub children: Vec<FrameId>,
    pub slots: Vec<Slot>,
    /// Return type marker; `None` means procedure (or not yet known, while
    /// the frame's own subtree is still being traversed).
    pub returns: Option<ExprTy>,
    /// Accumulated body source for this frame's statements.
    pub body: String,
}

impl Frame {
    fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn env_struct_name(&self) -> String {
        format!("{}__env", self.name)
    }
}

/// A resolved variable/parameter reference: the context-passing expression
/// that reaches the slot from the requesting frame.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub ty: ExprTy,
    pub text: String,
    /// Frames climbed to find the slot; 0 means the current frame.
    pub hops: usize,
}

/// A resolved invocation: the full call expression including the leading
/// enclosing-context argument.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub returns: Option<ExprTy>,
    pub text: String,
    pub hops: usize,
}

/// The scope tree, stored as an arena of frame records.
#[derive(Debug, Default)]
pub struct FrameArena {
    frames: Vec<Frame>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Open a new frame under `parent`. Sibling names must be unique.
    pub fn push_frame(
        &mut self,
        name: &str,
        parent: Option<FrameId>,
        span: Span,
    ) -> SemanticResult<FrameId> {
        if let Some(parent_id) = parent {
            let parent_frame = self.frame(parent_id);
            let duplicate = parent_frame
                .children
                .iter()
                .any(|&child| self.frame(child).name == name);
            if duplicate {
                return Err(SemanticError::DuplicateDefinition {
                    name: name.to_string(),
                    owner: parent_frame.name.clone(),
                    span,
                });
            }
        }
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            slots: Vec::new(),
            returns: None,
            body: String::new(),
        });
        if let Some(parent_id) = parent {
            self.frames[parent_id.0].children.push(id);
        }
        Ok(id)
    }

    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    pub fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.0]
    }

    /// Register a parameter slot. Duplicate names within the frame fail.
    pub fn define_parameter(
        &mut self,
        id: FrameId,
        name: &str,
        ty: ExprTy,
        span: Span,
    ) -> SemanticResult<()> {
        self.define_slot(id, name, ty, SlotKind::Parameter, span)
    }

    /// Create a variable slot on first assignment.
    pub fn define_variable(
        &mut self,
        id: FrameId,
        name: &str,
        ty: ExprTy,
        span: Span,
    ) -> SemanticResult<()> {
        self.define_slot(id, name, ty, SlotKind::Variable, span)
    }

    fn define_slot(
        &mut self,
        id: FrameId,
        name: &str,
        ty: ExprTy,
        kind: SlotKind,
        span: Span,
    ) -> SemanticResult<()> {
        let frame = self.frame_mut(id);
        if frame.slot(name).is_some() {
            return Err(SemanticError::DuplicateDefinition {
                name: name.to_string(),
                owner: frame.name.clone(),
                span,
            });
        }
        frame.slots.push(Slot {
            name: name.to_string(),
            ty,
            kind,
        });
        Ok(())
    }

    /// Resolve a variable/parameter reference from `from`, climbing parents
    /// and prepending one enclosing-context indirection per level.
    pub fn find_reference(&self, from: FrameId, name: &str) -> Option<Resolved> {
        let mut current = Some(from);
        let mut hops = 0;
        while let Some(id) = current {
            let frame = self.frame(id);
            if let Some(slot) = frame.slot(name) {
                let mut text = String::new();
                for _ in 0..hops {
                    text.push_str("__env.");
                }
                text.push_str(name);
                return Some(Resolved {
                    ty: slot.ty,
                    text,
                    hops,
                });
            }
            current = frame.parent;
            hops += 1;
        }
        None
    }

    /// Resolve an invocation from `from`, climbing parents until a nested
    /// definition of `name` is found.
    ///
    /// A callee defined directly in the caller's own frame gets a brand-new
    /// context built from the caller's slots; a callee found `k` frames up
    /// reuses exactly `k` existing indirections and constructs nothing.
    pub fn find_invocation(&self, from: FrameId, name: &str, args: &[String]) -> Option<Invocation> {
        let mut current = Some(from);
        let mut hops = 0;
        let callee = loop {
            let id = current?;
            let frame = self.frame(id);
            let found = frame
                .children
                .iter()
                .copied()
                .find(|&child| self.frame(child).name == name);
            if let Some(callee) = found {
                break callee;
            }
            current = frame.parent;
            hops += 1;
        };
        let env_arg = if hops == 0 {
            self.env_construction(from)
        } else {
            let mut chain = "__env".to_string();
            for _ in 1..hops {
                chain.push_str(".__env");
            }
            chain.push_str(".clone()");
            chain
        };
        let mut all_args = vec![env_arg];
        all_args.extend(args.iter().cloned());
        Some(Invocation {
            returns: self.frame(callee).returns,
            text: format!("{}({})", name, all_args.join(", ")),
            hops,
        })
    }

    /// Construction of the caller's own context record, from the slots it
    /// has at this point. Fields added by later statements are filled with
    /// defaults; a callee resolvable at this call site can never name them.
    fn env_construction(&self, id: FrameId) -> String {
        let frame = self.frame(id);
        let mut fields = Vec::new();
        if frame.parent.is_some() {
            fields.push("__env: __env.clone()".to_string());
        }
        for slot in &frame.slots {
            fields.push(slot.name.clone());
        }
        fields.push("..Default::default()".to_string());
        format!("{} {{ {} }}", frame.env_struct_name(), fields.join(", "))
    }

    /// Chain of frame names from `id` up to the root, for the generated
    /// ancestry comment.
    fn ancestry(&self, id: FrameId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(frame_id) = current {
            let frame = self.frame(frame_id);
            names.push(frame.name.clone());
            current = frame.parent;
        }
        names.join(" in ")
    }

    /// Render the frame as a host-language function: its context record,
    /// its nested definitions (recursively, first), variable declarations,
    /// then the accumulated body.
    pub fn render(&self, id: FrameId) -> String {
        let frame = self.frame(id);

        let mut env_fields = String::new();
        if let Some(parent) = frame.parent {
            env_fields.push_str(&format!(
                "    __env: {},\n",
                self.frame(parent).env_struct_name()
            ));
        }
        for slot in &frame.slots {
            env_fields.push_str(&format!("    {}: {},\n", slot.name, slot.ty.rust_type()));
        }
        let env_struct = format!(
            "#[derive(Clone, Default)]\nstruct {} {{\n{}}}\n",
            frame.env_struct_name(),
            env_fields
        );

        let nested: String = frame
            .children
            .iter()
            .map(|&child| self.render(child))
            .collect();

        let var_defs: String = frame
            .slots
            .iter()
            .filter(|slot| slot.kind == SlotKind::Variable)
            .map(|slot| format!("let mut {}: {};\n", slot.name, slot.ty.rust_type()))
            .collect();

        let mut params = Vec::new();
        if let Some(parent) = frame.parent {
            params.push(format!(
                "mut __env: {}",
                self.frame(parent).env_struct_name()
            ));
        }
        for slot in frame.slots.iter().filter(|s| s.kind == SlotKind::Parameter) {
            params.push(format!("mut {}: {}", slot.name, slot.ty.rust_type()));
        }
        let ret = match frame.returns {
            Some(ty) => format!(" -> {}", ty.rust_type()),
            None => String::new(),
        };

        format!(
            "fn {}({}){} {{\n{}}}\n",
            frame.name,
            params.join(", "),
            ret,
            indent(&format!(
                "// {}\n{}{}{}{}",
                self.ancestry(id),
                env_struct,
                nested,
                var_defs,
                frame.body
            ))
        )
    }
}
