use pasco_frontend::ast::*;
use pasco_frontend::dump;
use pasco_frontend::span::{SpanLoc, Spanned, SpannedBox};
use pasco_frontend::visitor::Visitable;

mod common;

use common::*;

fn do_ast_dump(program: &SpannedBox<Program>) -> String {
    let (semantic_context, _, _) = check(program);

    let mut dumper = dump::ASTDumper::new(&semantic_context);
    dumper.set_no_ids();
    program
        .get()
        .walk(&mut dumper, program.loc(), program.id());
    dumper.to_string()
}

fn type_at(locus: SpanLoc, p: PrimitiveType) -> SpannedBox<TypeDenoter> {
    SpannedBox::new(
        locus,
        TypeDenoter::TypeIdentifier(TypeIdentifier(Spanned::new(locus, p))),
    )
}

fn var_decl_names_at(
    locus: SpanLoc,
    names: &[&str],
    t: SpannedBox<TypeDenoter>,
) -> SpannedBox<VariableDeclaration> {
    let names = names
        .iter()
        .map(|n| Spanned::new(locus, n.to_string()))
        .collect();
    SpannedBox::new(locus, VariableDeclaration(names, t))
}

fn variable_at(locus: SpanLoc, n: &str) -> SpannedBox<Expr> {
    SpannedBox::new(
        locus,
        Expr::Variable(ExprVariable(Spanned::new(locus, n.to_string()))),
    )
}

fn assignment_at(locus: SpanLoc, target: &str, e: SpannedBox<Expr>) -> SpannedBox<Stmt> {
    let target = SpannedBox::new(
        locus,
        AssigVariable(Spanned::new(locus, target.to_string())),
    );
    SpannedBox::new(locus, Stmt::Assignment(StmtAssignment(target, e)))
}

#[test]
fn ast_dump() {
    // program test(input, output);
    // var
    //   x : integer;
    //   y, z : real;
    // begin
    //    x := 3;
    //    z := x + y
    // end.
    let three = SpannedBox::new(
        at(6, 9),
        Expr::Const(ExprConst(SpannedBox::new(
            at(6, 9),
            Const::Integer(ConstInteger(Spanned::new(at(6, 9), "3".to_string()))),
        ))),
    );
    let sum = SpannedBox::new(
        at(7, 9),
        Expr::BinOp(ExprBinOp(
            Spanned::new(at(7, 11), BinOperand::Addition),
            variable_at(at(7, 9), "x"),
            variable_at(at(7, 13), "y"),
        )),
    );
    let statements = SpannedBox::new(
        at(5, 1),
        Stmt::Compound(StmtCompound(vec![
            assignment_at(at(6, 4), "x", three),
            assignment_at(at(7, 4), "z", sum),
        ])),
    );
    let variables = SpannedBox::new(
        at(2, 1),
        VariableDeclarationPart(vec![
            var_decl_names_at(at(3, 3), &["x"], type_at(at(3, 7), PrimitiveType::Integer)),
            var_decl_names_at(at(4, 3), &["y", "z"], type_at(at(4, 10), PrimitiveType::Real)),
        ]),
    );
    let heading = SpannedBox::new(
        at(1, 1),
        ProgramHeading(
            Spanned::new(at(1, 9), "test".to_string()),
            vec![
                Spanned::new(at(1, 14), "input".to_string()),
                Spanned::new(at(1, 21), "output".to_string()),
            ],
        ),
    );
    let p = SpannedBox::new(
        at(1, 1),
        Program(
            heading,
            SpannedBox::new(
                at(2, 1),
                Block(
                    None,
                    Some(variables),
                    None,
                    SpannedBox::new(at(5, 1), StatementPart(statements)),
                ),
            ),
        ),
    );

    let s = do_ast_dump(&p);

    println!("{}", s.trim());

    assert_eq!(
        s.trim(),
        r#"
Program 1:1
├─╴ProgramHeading 1:1 "test" ["input", "output"]
└─╴Block 2:1
   ├─╴VariableDeclarationPart 2:1
   │  ├─╴VariableDeclaration 3:3 ["x"]
   │  │  └─╴TypeIdentifier 3:7 "integer" integer
   │  └─╴VariableDeclaration 4:3 ["y", "z"]
   │     └─╴TypeIdentifier 4:10 "real" real
   └─╴StatementPart 5:1
      └─╴StmtCompound 5:1
         ├─╴StmtAssignment 6:4 lhs integer rhs integer
         │  ├─╴AssigVariable 6:4 "x" integer
         │  └─╴ExprConst 6:9 integer
         │     └─╴ConstInteger 6:9 3 integer
         └─╴StmtAssignment 7:4 lhs real rhs real
            ├─╴AssigVariable 7:4 "z" real
            └─╴BinOp 7:9 + real
               ├─╴ExprVariable 7:9 "x" integer
               └─╴ExprVariable 7:13 "y" real
"#
        .trim()
    );
}

#[test]
fn ast_dump_routines() {
    // function f(var a : integer) : integer;
    // begin f := a end;
    let p = program(block(
        vec![],
        vec![],
        vec![function(
            "f",
            Some(vec![var_params(&["a"], PrimitiveType::Integer)]),
            PrimitiveType::Integer,
            block(vec![], vec![], vec![], vec![assign("f", var("a"))]),
        )],
        vec![pcall("writeln", Some(vec![call("f", vec![var("nope")])]))],
    ));

    let s = do_ast_dump(&p);
    let lines = s
        .lines()
        .map(|l| l.trim_start_matches(['│', '├', '└', '─', '╴', ' ']))
        .collect::<Vec<_>>();

    assert!(lines.contains(&"FunctionDefinition 1:1 \"f\" function(var integer): integer"));
    assert!(lines.contains(&"FormalParameterVariable 1:1 [\"a\"] var integer"));
    assert!(lines.contains(
        &"StmtAssignment 1:1 lhs function(var integer): integer rhs var integer result"
    ));
    assert!(lines.contains(&"StmtProcedureCall 1:1 \"writeln\""));
    assert!(lines.contains(&"ExprFunctionCall 1:1 \"f\" integer"));
    assert!(lines.contains(&"ExprVariable 1:1 \"nope\" <<error-type>>"));
}
