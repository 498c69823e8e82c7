// ABOUTME: Evaluator dispatching forms to special forms, user callables, and builtins

use crate::builtins::BuiltinTable;
use crate::env::Environment;
use crate::error::Error;
use crate::form::{Form, CONTINUE_MARKER};
use crate::registry::{FuncMacro, FuncMacroRegistry};
use std::rc::Rc;

/// Evaluation context: the process-wide func/macro registry and the fixed
/// builtin table. Environments are passed per call because frames belong to
/// the evaluation in progress, not the interpreter.
pub struct Interpreter {
    funcs: FuncMacroRegistry,
    builtins: BuiltinTable,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            funcs: FuncMacroRegistry::new(),
            builtins: BuiltinTable::new(),
        }
    }

    /// Dispatch, in order: word lookup; unit; special form; func/macro
    /// (newest first); builtin; otherwise unknown. Special forms win over
    /// user definitions, user definitions win over builtins.
    pub fn eval(&mut self, form: &Form, env: &Rc<Environment>) -> Result<Form, Error> {
        let items = match form {
            Form::Word(name) => {
                if let Some(value) = env.get(name) {
                    return Ok(value);
                }
                // number literals are their own value; anything else
                // unbound is fatal
                if form.is_decimal_word() {
                    return Ok(form.clone());
                }
                return Err(Error::Unbound(name.to_string()));
            }
            Form::List(items) => items,
        };

        if items.is_empty() {
            return Ok(Form::unit());
        }

        let head = match &items[0] {
            Form::Word(word) => word.clone(),
            Form::List(_) => {
                return Err(Error::structure(
                    "eval",
                    "first element of a list must be a word",
                ));
            }
        };
        let rest = &items[1..];

        match &*head {
            "quote" => eval_quote(rest),
            "if" => self.eval_if(rest, env),
            "let" => self.eval_let(rest, env),
            "loop" => self.eval_loop(rest, env),
            "cont" => self.eval_cont(rest, env),
            "func" => self.eval_definition("func", rest),
            "macro" => self.eval_definition("macro", rest),
            name => {
                if let Some(func_macro) = self.funcs.get(name) {
                    self.apply_func_macro(name, &func_macro, rest, env)
                } else if let Some(builtin) = self.builtins.get(name).copied() {
                    let mut args = Vec::with_capacity(rest.len());
                    for arg in rest {
                        args.push(self.eval(arg, env)?);
                    }
                    builtin.call(&args)
                } else {
                    Err(Error::UnknownFunction(name.to_string()))
                }
            }
        }
    }

    /// `[if c t e]`: only the word `"0"` selects the else branch
    fn eval_if(&mut self, rest: &[Form], env: &Rc<Environment>) -> Result<Form, Error> {
        if rest.len() != 3 {
            return Err(Error::arity("if", "3", rest.len()));
        }
        let condition = self.eval(&rest[0], env)?;
        let branch = if condition.is_false() {
            &rest[2]
        } else {
            &rest[1]
        };
        self.eval(branch, env)
    }

    /// Build the binding frame shared by `let` and `loop`. Each value is
    /// evaluated in the frame under construction, so later bindings see
    /// earlier ones.
    fn binding_frame(
        &mut self,
        name: &'static str,
        rest: &[Form],
        env: &Rc<Environment>,
    ) -> Result<Rc<Environment>, Error> {
        let Some(binding_form) = rest.first() else {
            return Err(Error::arity(name, "at least 1", 0));
        };
        let Form::List(pairs) = binding_form else {
            return Err(Error::structure(name, "bindings must be a list"));
        };
        if pairs.len() % 2 != 0 {
            return Err(Error::structure(name, "bindings must have even length"));
        }
        let scope = Environment::with_parent(env.clone());
        for pair in pairs.chunks(2) {
            let Form::Word(key) = &pair[0] else {
                return Err(Error::structure(name, "binding names must be words"));
            };
            let value = self.eval(&pair[1], &scope)?;
            scope.define(key.clone(), value);
        }
        Ok(scope)
    }

    fn eval_let(&mut self, rest: &[Form], env: &Rc<Environment>) -> Result<Form, Error> {
        let scope = self.binding_frame("let", rest, env)?;
        let mut result = Form::unit();
        for body in &rest[1..] {
            result = self.eval(body, &scope)?;
        }
        Ok(result)
    }

    /// `loop` runs its bodies like `let`, then re-runs them with rebound
    /// values for as long as the last body yields a continuation packet.
    fn eval_loop(&mut self, rest: &[Form], env: &Rc<Environment>) -> Result<Form, Error> {
        let scope = self.binding_frame("loop", rest, env)?;
        let binding_count = scope.binding_count();
        loop {
            let mut result = Form::unit();
            for body in &rest[1..] {
                result = self.eval(body, &scope)?;
            }
            let Some(values) = continuation_values(&result) else {
                return Ok(result);
            };
            if values.len() != binding_count {
                return Err(Error::structure(
                    "loop",
                    format!(
                        "continuation carries {} values for {} bindings",
                        values.len(),
                        binding_count
                    ),
                ));
            }
            scope.rebind_all(values);
        }
    }

    /// `[cont e1 .. eN]` packages evaluated arguments behind the marker.
    /// Outside a `loop` the packet is an ordinary list value.
    fn eval_cont(&mut self, rest: &[Form], env: &Rc<Environment>) -> Result<Form, Error> {
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(Form::word(CONTINUE_MARKER));
        for arg in rest {
            items.push(self.eval(arg, env)?);
        }
        Ok(Form::list(items))
    }

    /// `[func name [params] bodies..]` and `[macro ..]`: register and
    /// return unit. A trailing `.. rest` in the parameter list makes the
    /// callable variadic.
    fn eval_definition(&mut self, kind: &'static str, rest: &[Form]) -> Result<Form, Error> {
        if rest.len() < 2 {
            return Err(Error::arity(kind, "at least 2", rest.len()));
        }
        let Form::Word(name) = &rest[0] else {
            return Err(Error::structure(kind, "name must be a word"));
        };
        let Form::List(param_forms) = &rest[1] else {
            return Err(Error::structure(kind, "parameters must be a list"));
        };
        let mut params = Vec::with_capacity(param_forms.len());
        for param in param_forms.iter() {
            let Form::Word(param) = param else {
                return Err(Error::structure(kind, "parameters must be words"));
            };
            params.push(param.clone());
        }

        let rest_param = if params.len() >= 2 && &*params[params.len() - 2] == ".." {
            let rest_param = params.pop();
            params.pop();
            rest_param
        } else {
            None
        };

        self.funcs.define(
            name.clone(),
            FuncMacro {
                is_macro: kind == "macro",
                params,
                rest_param,
                bodies: rest[2..].into(),
            },
        );
        Ok(Form::unit())
    }

    /// Call a user-defined func or macro. The parameter frame extends the
    /// caller's environment; macros receive arguments unevaluated and have
    /// their result evaluated once more in the caller's environment.
    fn apply_func_macro(
        &mut self,
        name: &str,
        func_macro: &FuncMacro,
        arg_forms: &[Form],
        env: &Rc<Environment>,
    ) -> Result<Form, Error> {
        let given = arg_forms.len();
        let arity = func_macro.params.len();
        if func_macro.rest_param.is_none() {
            if given != arity {
                return Err(Error::arity(name, arity.to_string(), given));
            }
        } else if given < arity {
            return Err(Error::arity(name, format!("at least {}", arity), given));
        }

        let args: Vec<Form> = if func_macro.is_macro {
            arg_forms.to_vec()
        } else {
            let mut evaluated = Vec::with_capacity(given);
            for arg in arg_forms {
                evaluated.push(self.eval(arg, env)?);
            }
            evaluated
        };

        let frame = Environment::with_parent(env.clone());
        for (param, arg) in func_macro.params.iter().zip(&args) {
            frame.define(param.clone(), arg.clone());
        }
        if let Some(rest_param) = &func_macro.rest_param {
            frame.define(rest_param.clone(), Form::list(args[arity..].to_vec()));
        }

        let mut result = Form::unit();
        for body in func_macro.bodies.iter() {
            result = self.eval(body, &frame)?;
        }
        if func_macro.is_macro {
            result = self.eval(&result, env)?;
        }
        Ok(result)
    }
}

fn eval_quote(rest: &[Form]) -> Result<Form, Error> {
    if rest.len() != 1 {
        return Err(Error::arity("quote", "1", rest.len()));
    }
    Ok(rest[0].clone())
}

/// The argument slots of a continuation packet: a list whose head is a word
/// with the marker's bytes. The head check guards against user lists that
/// merely start with another list.
fn continuation_values(form: &Form) -> Option<&[Form]> {
    let Form::List(items) = form else {
        return None;
    };
    match items.first() {
        Some(Form::Word(head)) if &**head == CONTINUE_MARKER => Some(&items[1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_all, parse_one};

    fn eval_source(source: &str) -> Result<Form, Error> {
        let mut interp = Interpreter::new();
        let env = Environment::new();
        let mut result = Form::unit();
        for form in parse_all(source)? {
            result = interp.eval(&form, &env)?;
        }
        Ok(result)
    }

    fn assert_evals_to(source: &str, expected: &str) {
        assert_eq!(
            eval_source(source),
            Ok(parse_one(expected).unwrap()),
            "source: {}",
            source
        );
    }

    // ========================================================================
    // Words, unit, quote
    // ========================================================================

    #[test]
    fn test_eval_unbound_word() {
        assert_eq!(
            eval_source("nope"),
            Err(Error::Unbound("nope".to_string()))
        );
    }

    #[test]
    fn test_decimal_words_self_evaluate() {
        assert_evals_to("5", "5");
        assert_evals_to("007", "007");
    }

    #[test]
    fn test_bindings_shadow_decimal_words() {
        // lookup runs before the number-literal fallback
        assert_evals_to("[let [5 [quote x]] 5]", "x");
    }

    #[test]
    fn test_eval_empty_list_is_unit() {
        assert_evals_to("[]", "[]");
    }

    #[test]
    fn test_eval_list_head_must_be_word() {
        let err = eval_source("[[a] b]").unwrap_err();
        assert!(matches!(err, Error::Structure { .. }));
    }

    #[test]
    fn test_quote_returns_argument_unevaluated() {
        assert_evals_to("[quote x]", "x");
        assert_evals_to("[quote [a [b c] d]]", "[a [b c] d]");
        assert_evals_to("[quote [add 1 2]]", "[add 1 2]");
    }

    #[test]
    fn test_quote_arity() {
        assert_eq!(eval_source("[quote]"), Err(Error::arity("quote", "1", 0)));
        assert_eq!(
            eval_source("[quote a b]"),
            Err(Error::arity("quote", "1", 2))
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval_source("[frobnicate 1]"),
            Err(Error::UnknownFunction("frobnicate".to_string()))
        );
    }

    // ========================================================================
    // if
    // ========================================================================

    #[test]
    fn test_if_zero_word_is_false() {
        assert_evals_to("[if [quote 0] [quote then] [quote else]]", "else");
    }

    #[test]
    fn test_if_other_words_are_true() {
        assert_evals_to("[if [quote 1] [quote then] [quote else]]", "then");
        assert_evals_to("[if [quote x] [quote then] [quote else]]", "then");
        assert_evals_to("[if [quote 00] [quote then] [quote else]]", "then");
    }

    #[test]
    fn test_if_unit_is_true() {
        // any list, unit included, is true
        assert_evals_to("[if [quote []] [quote then] [quote else]]", "then");
    }

    #[test]
    fn test_if_takes_untaken_branch_lazily() {
        // the untaken branch would be a fatal unbound error if evaluated
        assert_evals_to("[if [quote 1] [quote ok] boom]", "ok");
        assert_evals_to("[if [quote 0] boom [quote ok]]", "ok");
    }

    #[test]
    fn test_if_arity() {
        assert_eq!(
            eval_source("[if [quote 1] a]"),
            Err(Error::arity("if", "3", 2))
        );
    }

    // ========================================================================
    // let
    // ========================================================================

    #[test]
    fn test_let_binds_and_evaluates_body() {
        assert_evals_to("[let [x [quote 10]] x]", "10");
    }

    #[test]
    fn test_let_later_bindings_see_earlier_ones() {
        assert_evals_to("[let [x 10 y [add x 5]] [sub y x]]", "5");
    }

    #[test]
    fn test_let_empty_bindings() {
        assert_evals_to("[let [] [quote 42]]", "42");
    }

    #[test]
    fn test_let_no_bodies_is_unit() {
        assert_evals_to("[let [x 1]]", "[]");
    }

    #[test]
    fn test_let_last_body_wins() {
        assert_evals_to("[let [] [quote 1] [quote 2] [quote 3]]", "3");
    }

    #[test]
    fn test_let_shadowing() {
        assert_evals_to("[let [x 1] [let [x 2] x]]", "2");
        assert_evals_to("[let [x 1 x 2] x]", "2");
    }

    #[test]
    fn test_let_binding_values_are_evaluated() {
        assert_eq!(
            eval_source("[let [x y] x]"),
            Err(Error::Unbound("y".to_string()))
        );
    }

    #[test]
    fn test_let_structure_errors() {
        assert!(matches!(
            eval_source("[let x x]"),
            Err(Error::Structure { .. })
        ));
        assert!(matches!(
            eval_source("[let [x] x]"),
            Err(Error::Structure { .. })
        ));
        assert!(matches!(
            eval_source("[let [[a] 1] [quote x]]"),
            Err(Error::Structure { .. })
        ));
    }

    // ========================================================================
    // loop and cont
    // ========================================================================

    #[test]
    fn test_loop_without_continuation_is_like_let() {
        assert_evals_to("[loop [x 5] x]", "5");
    }

    #[test]
    fn test_loop_iterates_on_continuation() {
        assert_evals_to(
            "[loop [i 0 s 0] [if [lt i 5] [cont [add i 1] [add s i]] s]]",
            "10",
        );
    }

    #[test]
    fn test_loop_counts_down() {
        assert_evals_to("[loop [n 10] [if [gt n 0] [cont [sub n 1]] n]]", "0");
    }

    #[test]
    fn test_loop_many_iterations() {
        // iterative splicing, not recursion: would overflow a call stack
        // if each continuation consumed a frame
        assert_evals_to(
            "[loop [i 0] [if [lt i 100000] [cont [add i 1]] i]]",
            "100000",
        );
    }

    #[test]
    fn test_loop_continuation_arity_mismatch() {
        let err = eval_source("[loop [i 0] [cont 1 2]]").unwrap_err();
        assert!(matches!(err, Error::Structure { .. }));
    }

    #[test]
    fn test_cont_outside_loop_escapes_as_data() {
        let result = eval_source("[cont [quote a] [quote b]]").unwrap();
        let Form::List(items) = &result else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Form::word(CONTINUE_MARKER));
        assert_eq!(items[1], Form::word("a"));
        assert_eq!(items[2], Form::word("b"));
    }

    #[test]
    fn test_cont_packet_is_observable_data() {
        // a packet returned from a non-tail position is plain data
        assert_evals_to("[size [cont [quote a]]]", "2");
    }

    #[test]
    fn test_user_list_cannot_fake_continuation() {
        // a non-empty result list whose head is not the marker word is
        // plain data; the head check must not assume a word
        assert_evals_to("[loop [x 1] [concat [quote [[a]]] []]]", "[[a]]");
        assert_evals_to("[loop [x 1] [quote [continue 2]]]", "[continue 2]");
    }

    // ========================================================================
    // func
    // ========================================================================

    #[test]
    fn test_func_definition_returns_unit() {
        assert_evals_to("[func inc [n] [add n 1]]", "[]");
    }

    #[test]
    fn test_func_call() {
        assert_evals_to("[func inc [n] [add n 1]] [inc 41]", "42");
    }

    #[test]
    fn test_func_multiple_bodies() {
        assert_evals_to(
            "[func both [n] [add n 1] [add n 2]] [both 1]",
            "3",
        );
    }

    #[test]
    fn test_func_zero_bodies_returns_unit() {
        assert_evals_to("[func nothing []] [nothing]", "[]");
    }

    #[test]
    fn test_func_recursion() {
        assert_evals_to(
            "[func fact [n] [if [le n 1] 1 [mul-by-fact n]]]
             [func mul-by-fact [n] [let [r [fact [sub n 1]]]
               [loop [acc 0 k r] [if [gt k 0] [cont [add acc n] [sub k 1]] acc]]]]
             [fact 5]",
            "120",
        );
    }

    #[test]
    fn test_func_arity_mismatch() {
        let source = "[func inc [n] [add n 1]] [inc 1 2]";
        assert_eq!(eval_source(source), Err(Error::arity("inc", "1", 2)));
    }

    #[test]
    fn test_func_redefinition_shadows() {
        assert_evals_to(
            "[func f [] [quote first]] [func f [] [quote second]] [f]",
            "second",
        );
    }

    #[test]
    fn test_user_func_shadows_builtin() {
        assert_evals_to("[func add [a b] [quote shadowed]] [add 1 2]", "shadowed");
    }

    #[test]
    fn test_special_forms_are_not_shadowable() {
        assert_evals_to("[func quote [x] [quote nope]] [quote 42]", "42");
    }

    #[test]
    fn test_func_args_evaluated_in_caller_env() {
        assert_evals_to(
            "[func twice [n] [add n n]] [let [x 21] [twice x]]",
            "42",
        );
    }

    #[test]
    fn test_func_body_sees_caller_bindings() {
        // late-bound scoping: the parameter frame extends the caller's
        // environment, so free words in the body resolve at the call site
        assert_evals_to(
            "[func show [] free] [let [free [quote seen]] [show]]",
            "seen",
        );
    }

    // ========================================================================
    // rest parameters
    // ========================================================================

    #[test]
    fn test_rest_param_collects_surplus() {
        assert_evals_to("[func tail [x .. xs] xs] [tail 1 2 3]", "[2 3]");
    }

    #[test]
    fn test_rest_param_may_be_empty() {
        assert_evals_to("[func tail [x .. xs] xs] [tail 1]", "[]");
    }

    #[test]
    fn test_rest_param_only() {
        assert_evals_to("[func all [.. xs] xs] [all 1 2 3]", "[1 2 3]");
        assert_evals_to("[func all [.. xs] xs] [all]", "[]");
    }

    #[test]
    fn test_rest_param_arity_floor() {
        let source = "[func f [a b .. r] r] [f 1]";
        assert_eq!(
            eval_source(source),
            Err(Error::arity("f", "at least 2", 1))
        );
    }

    #[test]
    fn test_definition_structure_errors() {
        assert!(matches!(
            eval_source("[func [f] [] []]"),
            Err(Error::Structure { .. })
        ));
        assert!(matches!(
            eval_source("[func f x []]"),
            Err(Error::Structure { .. })
        ));
        assert!(matches!(
            eval_source("[func f [[a]] []]"),
            Err(Error::Structure { .. })
        ));
        assert_eq!(eval_source("[func f]"), Err(Error::arity("func", "at least 2", 1)));
    }

    // ========================================================================
    // macro
    // ========================================================================

    #[test]
    fn test_macro_receives_arguments_unevaluated() {
        // the argument is an unbound word; a func would die evaluating it
        assert_evals_to("[macro name-of [x] [quote x] [quote [quote ok]]] [name-of boom]", "ok");
    }

    #[test]
    fn test_macro_result_is_reevaluated() {
        // the macro builds the form [add 1 2], which then runs
        assert_evals_to(
            "[macro sum12 [] [quote [add 1 2]]] [sum12]",
            "3",
        );
    }

    #[test]
    fn test_macro_builds_code_from_pieces() {
        // the packet from cont is scavenged for its payload, producing the
        // call form [sub 10 3], which the macro return then evaluates
        assert_evals_to(
            "[macro flip [op a b] [slice [cont op b a] 1 4]] [flip sub 3 10]",
            "7",
        );
    }

    #[test]
    fn test_builtin_args_are_evaluated() {
        assert_evals_to("[add [add 1 2] [add 3 4]]", "10");
    }

    // ========================================================================
    // gensym and log through the evaluator
    // ========================================================================

    #[test]
    fn test_gensym_distinct_across_calls() {
        let mut interp = Interpreter::new();
        let env = Environment::new();
        let call = parse_one("[gensym]").unwrap();
        let a = interp.eval(&call, &env).unwrap();
        let b = interp.eval(&call, &env).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_log_yields_unit() {
        assert_evals_to("[log [quote [a b]]]", "[]");
    }
}
