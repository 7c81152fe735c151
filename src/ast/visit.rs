//! Read-only and rewriting tree traversals.

use crate::ast::Node;

/// Visits `node` and every descendant node in depth-first pre-order.
///
/// Word structs embedded in other nodes (loop variables, case subjects,
/// redirect operators) are not themselves tree nodes and are not visited.
pub fn walk<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    visit(node);
    match node {
        Node::Script(script) => {
            for child in &script.commands {
                walk(child, visit);
            }
        }
        Node::Command(command) => {
            for child in command.prefix.iter().chain(&command.suffix) {
                walk(child, visit);
            }
        }
        Node::Pipeline(pipeline) => {
            for child in &pipeline.commands {
                walk(child, visit);
            }
        }
        Node::LogicalExpression(expression) => {
            walk(&expression.left, visit);
            walk(&expression.right, visit);
        }
        Node::If(clause) => {
            walk(&clause.clause, visit);
            walk(&clause.then, visit);
            if let Some(else_branch) = &clause.else_branch {
                walk(else_branch, visit);
            }
        }
        Node::While(clause) => {
            walk(&clause.clause, visit);
            walk(&clause.body, visit);
        }
        Node::Until(clause) => {
            walk(&clause.clause, visit);
            walk(&clause.body, visit);
        }
        Node::For(clause) => {
            walk(&clause.body, visit);
        }
        Node::Case(clause) => {
            for child in &clause.cases {
                walk(child, visit);
            }
        }
        Node::CaseItem(item) => {
            if let Some(body) = &item.body {
                walk(body, visit);
            }
        }
        Node::Function(function) => {
            walk(&function.body, visit);
            for child in &function.redirections {
                walk(child, visit);
            }
        }
        Node::Subshell(subshell) => {
            walk(&subshell.list, visit);
        }
        Node::CompoundList(list) => {
            for child in list.commands.iter().chain(&list.redirections) {
                walk(child, visit);
            }
        }
        Node::Redirect(_) | Node::Word(_) | Node::AssignmentWord(_) => {}
    }
}

/// Rebuilds the tree bottom-up, applying `f` to every node after its
/// children have been rewritten. `rewrite(tree, &mut |n| n)` returns the
/// tree unchanged.
pub fn rewrite<F>(node: Node, f: &mut F) -> Node
where
    F: FnMut(Node) -> Node,
{
    let node = match node {
        Node::Script(mut script) => {
            script.commands = script
                .commands
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::Script(script)
        }
        Node::Command(mut command) => {
            command.prefix = command
                .prefix
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            command.suffix = command
                .suffix
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::Command(command)
        }
        Node::Pipeline(mut pipeline) => {
            pipeline.commands = pipeline
                .commands
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::Pipeline(pipeline)
        }
        Node::LogicalExpression(mut expression) => {
            expression.left = Box::new(rewrite(*expression.left, f));
            expression.right = Box::new(rewrite(*expression.right, f));
            Node::LogicalExpression(expression)
        }
        Node::If(mut clause) => {
            clause.clause = Box::new(rewrite(*clause.clause, f));
            clause.then = Box::new(rewrite(*clause.then, f));
            clause.else_branch = clause
                .else_branch
                .map(|branch| Box::new(rewrite(*branch, f)));
            Node::If(clause)
        }
        Node::While(mut clause) => {
            clause.clause = Box::new(rewrite(*clause.clause, f));
            clause.body = Box::new(rewrite(*clause.body, f));
            Node::While(clause)
        }
        Node::Until(mut clause) => {
            clause.clause = Box::new(rewrite(*clause.clause, f));
            clause.body = Box::new(rewrite(*clause.body, f));
            Node::Until(clause)
        }
        Node::For(mut clause) => {
            clause.body = Box::new(rewrite(*clause.body, f));
            Node::For(clause)
        }
        Node::Case(mut clause) => {
            clause.cases = clause
                .cases
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::Case(clause)
        }
        Node::CaseItem(mut item) => {
            item.body = item.body.map(|body| Box::new(rewrite(*body, f)));
            Node::CaseItem(item)
        }
        Node::Function(mut function) => {
            function.body = Box::new(rewrite(*function.body, f));
            function.redirections = function
                .redirections
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::Function(function)
        }
        Node::Subshell(mut subshell) => {
            subshell.list = Box::new(rewrite(*subshell.list, f));
            Node::Subshell(subshell)
        }
        Node::CompoundList(mut list) => {
            list.commands = list
                .commands
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            list.redirections = list
                .redirections
                .into_iter()
                .map(|child| rewrite(child, f))
                .collect();
            Node::CompoundList(list)
        }
        leaf @ (Node::Redirect(_) | Node::Word(_) | Node::AssignmentWord(_)) => leaf,
    };
    f(node)
}
