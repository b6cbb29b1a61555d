use std::sync::Arc;

use declarule::{ExprEvaluator, Facts, RuleFactory, RulesEngine, YamlRuleReader};

fn main() {
    // One winner: the highest-precedence matching tier fires, the rest
    // are skipped even though they also match.
    let source = "\
name: discount tier
description: pick exactly one discount
priority: 1
compositeRuleType: ActivationRuleGroup
composingRules:
  - name: gold discount
    priority: 1
    condition: \"spend >= 1000\"
    actions: [\"discount = 30\"]
  - name: silver discount
    priority: 2
    condition: \"spend >= 500\"
    actions: [\"discount = 15\"]
  - name: base discount
    priority: 3
    condition: \"spend >= 0\"
    actions: [\"discount = 5\"]
";

    let factory = RuleFactory::new(YamlRuleReader::new(), Arc::new(ExprEvaluator::new()));
    let rules = factory.create_rules(source).expect("failed to build rules");

    for spend in [1200_i64, 600, 10] {
        let mut facts = Facts::new().with("spend", spend);
        RulesEngine::new()
            .fire(&rules, &mut facts)
            .expect("cycle failed");
        println!("spend = {spend}: {facts}");
    }
}
