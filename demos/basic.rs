use std::sync::Arc;

use declarule::{ExprEvaluator, Facts, RuleFactory, RulesEngine, YamlRuleReader};

fn main() {
    let source = "\
name: adult rule
description: when age is greater than 18, then mark as adult
priority: 1
condition: \"age > 18\"
actions:
  - \"adult = true\"
---
name: weather rule
description: when it rains, then take an umbrella
priority: 2
condition: \"rain == true\"
actions:
  - \"umbrella = true\"
";

    let factory = RuleFactory::new(YamlRuleReader::new(), Arc::new(ExprEvaluator::new()));
    let rules = factory.create_rules(source).expect("failed to build rules");
    println!("{rules}");

    let mut facts = Facts::new().with("age", 25_i64).with("rain", true);
    RulesEngine::new()
        .fire(&rules, &mut facts)
        .expect("cycle failed");

    println!("Facts after cycle: {facts}");
}
