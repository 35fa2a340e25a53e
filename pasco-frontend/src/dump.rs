use crate::ast;
use crate::semantic::SemanticContext;
use crate::span;
use crate::visitor::{Visitable, Visitor};
use std::fmt::Display;

/// Prints the tree, one node per line, with the types recorded by the
/// semantic checker.
pub struct ASTDumper<'a> {
    prefix: String,
    output: String,
    semantic_context: &'a SemanticContext,
    no_ids: bool,
}

impl<'a> ASTDumper<'a> {
    pub fn new(semantic_context: &'a SemanticContext) -> ASTDumper<'a> {
        ASTDumper {
            prefix: String::new(),
            output: String::new(),
            semantic_context,
            no_ids: false,
        }
    }

    pub fn set_no_ids(&mut self) {
        self.no_ids = true;
    }

    fn emit_line(&mut self, classname: &str, span: &span::SpanLoc, id: span::SpanId) {
        self.emit_line_payload(classname, span, id, "");
    }

    fn emit_line_payload(
        &mut self,
        classname: &str,
        span: &span::SpanLoc,
        id: span::SpanId,
        payload: &str,
    ) {
        let line = if self.no_ids {
            format!("{} {} {}", classname, span.begin(), payload)
        } else {
            format!(
                "{}[{}] {} {}",
                classname,
                id.get_number(),
                span.begin(),
                payload
            )
        };
        self.output.push_str(&self.get_prefix());
        self.output.push_str(line.trim_end());
        self.output.push('\n');
    }

    fn get_prefix(&self) -> String {
        let mut res = String::new();
        let char_len = self.prefix.chars().count();

        for (idx, c) in self.prefix.chars().enumerate() {
            if idx + 1 == char_len {
                res.push(c);
                res.push_str("─╴");
            } else if c == '├' {
                res.push_str("│  ");
            } else {
                res.push_str("   ");
            }
        }

        res
    }

    fn walk_child_with_prefix<T: Visitable>(&mut self, n: &span::SpannedBox<T>, marker: char) {
        self.prefix.push(marker);
        n.get().walk(self, n.loc(), n.id());
        self.prefix.pop();
    }

    fn walk_child<T: Visitable>(&mut self, n: &span::SpannedBox<T>) {
        self.walk_child_with_prefix(n, '├');
    }

    fn walk_last_child<T: Visitable>(&mut self, n: &span::SpannedBox<T>) {
        self.walk_child_with_prefix(n, '└');
    }

    fn walk_optional_child<T: Visitable>(&mut self, n: &Option<span::SpannedBox<T>>) {
        if let Some(n) = n {
            self.walk_child(n);
        }
    }

    fn walk_vec_child<T: Visitable>(&mut self, n: &[span::SpannedBox<T>], has_more: bool) {
        for (idx, c) in n.iter().enumerate() {
            if idx + 1 == n.len() && !has_more {
                self.walk_last_child(c);
            } else {
                self.walk_child(c);
            }
        }
    }

    fn type_to_string(&self, id: span::SpanId) -> String {
        let type_system = &self.semantic_context.type_system;
        match self.semantic_context.get_ast_type(id) {
            Some(type_id)
                if type_system.is_error_type(type_id)
                    || type_system.is_invalid_constant_type(type_id) =>
            {
                String::from("<<error-type>>")
            }
            Some(type_id) => type_system.get_type_name(type_id),
            None => String::from("<<no-type>>"),
        }
    }

    fn names(names: &[span::Spanned<String>]) -> String {
        format!("{:?}", names.iter().map(|x| x.get()).collect::<Vec<_>>())
    }
}

impl<'a> Display for ASTDumper<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output)
    }
}

impl<'a> Visitor for ASTDumper<'a> {
    fn unhandled_node_pre(&self, class: &str, span: &span::SpanLoc, _id: span::SpanId) {
        panic!("Unhandled node |{}| at {}", class, span.begin());
    }

    fn unhandled_node_leaf(&self, class: &str, span: &span::SpanLoc, _id: span::SpanId) {
        panic!("Unhandled leaf node |{}| at {}", class, span.begin());
    }

    fn visit_pre_program(
        &mut self,
        n: &ast::Program,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("Program", span, id);
        self.walk_child(&n.0);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_program_heading(
        &mut self,
        n: &ast::ProgramHeading,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{:?} {}", n.0.get(), Self::names(&n.1));
        self.emit_line_payload("ProgramHeading", span, id, &payload);
    }

    fn visit_pre_block(&mut self, n: &ast::Block, span: &span::SpanLoc, id: span::SpanId) -> bool {
        self.emit_line("Block", span, id);
        self.walk_optional_child(&n.0);
        self.walk_optional_child(&n.1);
        self.walk_optional_child(&n.2);
        self.walk_last_child(&n.3);
        false
    }

    fn visit_pre_statement_part(
        &mut self,
        n: &ast::StatementPart,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("StatementPart", span, id);
        self.walk_last_child(&n.0);
        false
    }

    fn visit_pre_constant_definition_part(
        &mut self,
        n: &ast::ConstantDefinitionPart,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("ConstantDefinitionPart", span, id);
        self.walk_vec_child(&n.0, false);
        false
    }

    fn visit_pre_constant_definition(
        &mut self,
        n: &ast::ConstantDefinition,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line_payload("ConstantDefinition", span, id, &format!("{:?}", n.0.get()));
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_const(
        &mut self,
        _n: &ast::Const,
        _span: &span::SpanLoc,
        _id: span::SpanId,
    ) -> bool {
        true
    }

    fn visit_const_integer(
        &mut self,
        n: &ast::ConstInteger,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstInteger", span, id, &payload);
    }

    fn visit_const_real(&mut self, n: &ast::ConstReal, span: &span::SpanLoc, id: span::SpanId) {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstReal", span, id, &payload);
    }

    fn visit_pre_const_signed(
        &mut self,
        n: &ast::ConstSigned,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstSigned", span, id, &payload);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_const_named(&mut self, n: &ast::ConstNamed, span: &span::SpanLoc, id: span::SpanId) {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstNamed", span, id, &payload);
    }

    fn visit_const_signed_named(
        &mut self,
        n: &ast::ConstSignedNamed,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{} {:?} {}", n.0.get(), n.1.get(), self.type_to_string(id));
        self.emit_line_payload("ConstSignedNamed", span, id, &payload);
    }

    fn visit_const_string_literal(
        &mut self,
        n: &ast::ConstStringLiteral,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstStringLiteral", span, id, &payload);
    }

    fn visit_const_chr(&mut self, n: &ast::ConstChr, span: &span::SpanLoc, id: span::SpanId) {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstChr", span, id, &payload);
    }

    fn visit_const_bool(&mut self, n: &ast::ConstBool, span: &span::SpanLoc, id: span::SpanId) {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ConstBool", span, id, &payload);
    }

    fn visit_pre_type_denoter(
        &mut self,
        _n: &ast::TypeDenoter,
        _span: &span::SpanLoc,
        _id: span::SpanId,
    ) -> bool {
        true
    }

    fn visit_type_identifier(
        &mut self,
        n: &ast::TypeIdentifier,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{:?} {}", n.0.get().to_string(), self.type_to_string(id));
        self.emit_line_payload("TypeIdentifier", span, id, &payload);
    }

    fn visit_pre_file_type(
        &mut self,
        n: &ast::FileType,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = self.type_to_string(id);
        self.emit_line_payload("FileType", span, id, &payload);
        self.walk_last_child(&n.0);
        false
    }

    fn visit_pre_variable_declaration_part(
        &mut self,
        n: &ast::VariableDeclarationPart,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("VariableDeclarationPart", span, id);
        self.walk_vec_child(&n.0, false);
        false
    }

    fn visit_pre_variable_declaration(
        &mut self,
        n: &ast::VariableDeclaration,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line_payload("VariableDeclaration", span, id, &Self::names(&n.0));
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_procedure_and_function_declaration_part(
        &mut self,
        n: &ast::ProcedureAndFunctionDeclarationPart,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("ProcedureAndFunctionDeclarationPart", span, id);
        self.walk_vec_child(&n.0, false);
        false
    }

    fn visit_pre_procedure_and_function_declaration(
        &mut self,
        _n: &ast::ProcedureAndFunctionDeclaration,
        _span: &span::SpanLoc,
        _id: span::SpanId,
    ) -> bool {
        true
    }

    fn visit_pre_procedure_definition(
        &mut self,
        n: &ast::ProcedureDefinition,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(n.0.id()));
        self.emit_line_payload("ProcedureDefinition", span, id, &payload);
        if let Some(params) = &n.1 {
            self.walk_vec_child(params, true);
        }
        self.walk_last_child(&n.2);
        false
    }

    fn visit_pre_function_definition(
        &mut self,
        n: &ast::FunctionDefinition,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(n.0.id()));
        self.emit_line_payload("FunctionDefinition", span, id, &payload);
        if let Some(params) = &n.1 {
            self.walk_vec_child(params, true);
        }
        self.walk_child(&n.2);
        self.walk_last_child(&n.3);
        false
    }

    fn visit_pre_formal_parameter(
        &mut self,
        _n: &ast::FormalParameter,
        _span: &span::SpanLoc,
        _id: span::SpanId,
    ) -> bool {
        true
    }

    fn visit_pre_formal_parameter_value(
        &mut self,
        n: &ast::FormalParameterValue,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{} {}", Self::names(&n.0), self.type_to_string(id));
        self.emit_line_payload("FormalParameterValue", span, id, &payload);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_formal_parameter_variable(
        &mut self,
        n: &ast::FormalParameterVariable,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{} {}", Self::names(&n.0), self.type_to_string(id));
        self.emit_line_payload("FormalParameterVariable", span, id, &payload);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_stmt(&mut self, _n: &ast::Stmt, _span: &span::SpanLoc, _id: span::SpanId) -> bool {
        true
    }

    fn visit_assig_variable(
        &mut self,
        n: &ast::AssigVariable,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("AssigVariable", span, id, &payload);
    }

    fn visit_pre_stmt_assignment(
        &mut self,
        n: &ast::StmtAssignment,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let mut payload = format!(
            "lhs {} rhs {}",
            self.type_to_string(n.0.id()),
            self.type_to_string(n.1.id())
        );
        // Assignments to the result of the enclosing function.
        if self.semantic_context.get_ast_type(id).is_some() {
            payload.push_str(" result");
        }
        self.emit_line_payload("StmtAssignment", span, id, &payload);
        self.walk_child(&n.0);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_stmt_procedure_call(
        &mut self,
        n: &ast::StmtProcedureCall,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line_payload("StmtProcedureCall", span, id, &format!("{:?}", n.0.get()));
        if let Some(args) = &n.1 {
            self.walk_vec_child(args, false);
        }
        false
    }

    fn visit_pre_stmt_compound(
        &mut self,
        n: &ast::StmtCompound,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("StmtCompound", span, id);
        self.walk_vec_child(&n.0, false);
        false
    }

    fn visit_pre_stmt_if(
        &mut self,
        n: &ast::StmtIf,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("StmtIf", span, id);
        self.walk_child(&n.0);
        match &n.2 {
            Some(else_stmt) => {
                self.walk_child(&n.1);
                self.walk_last_child(else_stmt);
            }
            None => self.walk_last_child(&n.1),
        }
        false
    }

    fn visit_pre_stmt_repeat_until(
        &mut self,
        n: &ast::StmtRepeatUntil,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("StmtRepeatUntil", span, id);
        self.walk_vec_child(&n.0, true);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_stmt_while_do(
        &mut self,
        n: &ast::StmtWhileDo,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line("StmtWhileDo", span, id);
        self.walk_child(&n.0);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_stmt_for(
        &mut self,
        n: &ast::StmtFor,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        self.emit_line_payload("StmtFor", span, id, &n.0.to_string());
        self.walk_child(&n.1);
        self.walk_child(&n.2);
        self.walk_child(&n.3);
        self.walk_last_child(&n.4);
        false
    }

    fn visit_stmt_empty(&mut self, _n: &ast::StmtEmpty, span: &span::SpanLoc, id: span::SpanId) {
        self.emit_line("StmtEmpty", span, id);
    }

    fn visit_pre_expr(&mut self, _n: &ast::Expr, _span: &span::SpanLoc, _id: span::SpanId) -> bool {
        true
    }

    fn visit_pre_expr_const(
        &mut self,
        n: &ast::ExprConst,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = self.type_to_string(id);
        self.emit_line_payload("ExprConst", span, id, &payload);
        self.walk_last_child(&n.0);
        false
    }

    fn visit_expr_variable(
        &mut self,
        n: &ast::ExprVariable,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ExprVariable", span, id, &payload);
    }

    fn visit_pre_expr_function_call(
        &mut self,
        n: &ast::ExprFunctionCall,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{:?} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("ExprFunctionCall", span, id, &payload);
        self.walk_vec_child(&n.1, false);
        false
    }

    fn visit_pre_expr_parentheses(
        &mut self,
        n: &ast::ExprParentheses,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = self.type_to_string(id);
        self.emit_line_payload("ExprParentheses", span, id, &payload);
        self.walk_last_child(&n.0);
        false
    }

    fn visit_pre_expr_un_op(
        &mut self,
        n: &ast::ExprUnOp,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("UnOp", span, id, &payload);
        self.walk_last_child(&n.1);
        false
    }

    fn visit_pre_expr_bin_op(
        &mut self,
        n: &ast::ExprBinOp,
        span: &span::SpanLoc,
        id: span::SpanId,
    ) -> bool {
        let payload = format!("{} {}", n.0.get(), self.type_to_string(id));
        self.emit_line_payload("BinOp", span, id, &payload);
        self.walk_child(&n.1);
        self.walk_last_child(&n.2);
        false
    }
}
